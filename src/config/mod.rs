pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::flags::CliConfig;

#[cfg(feature = "cli")]
mod flags {
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_file_extensions, validate_output_formats, validate_path, Validate,
        INPUT_EXTENSIONS,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "secret-santa")]
    #[command(about = "Draw Secret Santa recipients, avoiding last round's pairings")]
    pub struct CliConfig {
        /// Current participants (Employee_Name, Employee_EmailID)
        #[arg(long, default_value = "Employee-list.xlsx")]
        pub roster: String,

        /// Sheet to read from the roster workbook (first sheet if omitted)
        #[arg(long)]
        pub roster_sheet: Option<String>,

        /// Last round's result (Employee_EmailID, Secret_Child_EmailID)
        #[arg(long, default_value = "Secret-Santa-Game-Result-2023.xlsx")]
        pub prior: String,

        /// Sheet to read from the prior-round workbook (first sheet if omitted)
        #[arg(long)]
        pub prior_sheet: Option<String>,

        /// Directory relative paths are resolved against
        #[arg(long, default_value = ".")]
        pub workdir: String,

        #[arg(long, default_value = "output_secret_santa.csv")]
        pub output_file: String,

        #[arg(long, default_value = "output_secret_santa_report.json")]
        pub report_file: String,

        #[arg(long, value_delimiter = ',', default_value = "csv")]
        pub output_formats: Vec<String>,

        /// Seed for the draw; a random one is picked and logged if omitted
        #[arg(long)]
        pub seed: Option<u64>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn exchange_name(&self) -> &str {
            "secret-santa"
        }

        fn roster_path(&self) -> &str {
            &self.roster
        }

        fn roster_sheet(&self) -> Option<&str> {
            self.roster_sheet.as_deref()
        }

        fn prior_path(&self) -> &str {
            &self.prior
        }

        fn prior_sheet(&self) -> Option<&str> {
            self.prior_sheet.as_deref()
        }

        fn output_file(&self) -> &str {
            &self.output_file
        }

        fn report_file(&self) -> &str {
            &self.report_file
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn seed(&self) -> Option<u64> {
            self.seed
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("roster", &self.roster)?;
            validate_path("prior", &self.prior)?;
            validate_path("workdir", &self.workdir)?;
            validate_path("output_file", &self.output_file)?;
            validate_file_extensions(
                "input",
                &[self.roster.as_str(), self.prior.as_str()],
                INPUT_EXTENSIONS,
            )?;
            validate_output_formats("output_formats", &self.output_formats)?;
            if self.wants_format("json") {
                validate_path("report_file", &self.report_file)?;
            }
            Ok(())
        }
    }

}
