use crate::core::alignment::rescale::TargetRange;
use std::io::{self, Write};
use std::path::PathBuf;

/// A structure loaded by the viewer script under an object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptObject {
    pub path: PathBuf,
    pub name: String,
}

/// Writes a PyMOL script that colours every loaded structure by temperature factor.
///
/// The colour ramp spans `range`; residues still carrying the unset sentinel (negative
/// temperature factor) are painted grey.
pub fn write_pymol_script(
    objects: &[ScriptObject],
    range: &TargetRange,
    writer: &mut impl Write,
) -> io::Result<()> {
    for object in objects {
        writeln!(writer, "load {}, {}", object.path.display(), object.name)?;
    }
    writeln!(writer, "hide everything")?;
    writeln!(writer, "show cartoon")?;
    writeln!(writer, "set cartoon_putty_radius, 0.2")?;
    writeln!(
        writer,
        "spectrum b, blue_white_red, minimum={:.2}, maximum={:.2}",
        range.min, range.max
    )?;
    writeln!(writer, "color grey70, b < 0")?;
    writeln!(writer, "orient")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_loads_every_object_and_sets_colour_range() {
        let objects = vec![
            ScriptObject {
                path: PathBuf::from("overlay-a.pdb"),
                name: "a".to_string(),
            },
            ScriptObject {
                path: PathBuf::from("overlay-b.pdb"),
                name: "b".to_string(),
            },
        ];
        let mut buffer = Vec::new();
        write_pymol_script(&objects, &TargetRange::new(0.0, 100.0), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("load overlay-a.pdb, a\nload overlay-b.pdb, b\n"));
        assert!(text.contains("spectrum b, blue_white_red, minimum=0.00, maximum=100.00"));
        assert!(text.contains("color grey70, b < 0"));
    }
}
