use pdboverlay::core::alignment::columns::DEFAULT_COVERAGE_THRESHOLD;

pub struct ToolDefaults {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

pub struct DefaultsConfig {
    pub work_dir: &'static str,
    pub coverage_threshold: f64,
    pub bfactor_range: [f64; 2],
    pub aligner: ToolDefaults,
    pub superposer: ToolDefaults,
    pub superposed_prefix: &'static str,
    pub viewer: ToolDefaults,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            work_dir: "overlay-work",
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            bfactor_range: [0.0, 100.0],
            aligner: ToolDefaults {
                program: "muscle",
                args: &["-in", "{input}", "-out", "{output}", "-clw"],
            },
            superposer: ToolDefaults {
                program: "theseus",
                args: &["-A", "{alignment}", "-M", "{map}", "{structures}"],
            },
            superposed_prefix: "theseus_",
            viewer: ToolDefaults {
                program: "pymol",
                args: &["{script}"],
            },
        }
    }
}
