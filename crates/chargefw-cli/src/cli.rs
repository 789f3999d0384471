use chargefw::core::io::charges::OutputFormat;
use chargefw::engine::config::BondInference;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ChargeFW CLI - Compute per-atom partial charges of molecules with empirical methods such as EEM.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process molecules in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute partial charges for one or more PDB structures.
    Charges(ChargesArgs),
    /// List the available charge methods and the parameters they require.
    Methods,
    /// Print a summary of a structure: atoms, residues, bonds and total charge.
    Info(InfoArgs),
}

/// Arguments for the `charges` subcommand.
#[derive(Args, Debug)]
pub struct ChargesArgs {
    /// Input structure files in PDB format.
    #[arg(short, long, required = true, num_args = 1.., value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Path of the charge output file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Charge method (e.g. EEM, MPEOE, Formal). Overrides the config file.
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Parameter set in TOML format. Overrides the config file.
    #[arg(short, long, value_name = "PATH")]
    pub parameters: Option<PathBuf>,

    /// Output format. Overrides the config file.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// When to infer bonds from residue templates. Overrides the config file.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub bonds: Option<BondsArg>,

    /// Directory holding `amino_acids.txt` and `other_residues.txt` residue templates.
    /// Defaults to the templates bundled with the program.
    #[arg(long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Configuration file in TOML format supplying defaults for the options above.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input structure file in PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory holding residue templates used when the structure has no bonds.
    #[arg(long, value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Txt,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondsArg {
    Auto,
    Always,
    Never,
}

impl From<BondsArg> for BondInference {
    fn from(arg: BondsArg) -> Self {
        match arg {
            BondsArg::Auto => BondInference::Auto,
            BondsArg::Always => BondInference::Always,
            BondsArg::Never => BondInference::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn charges_accepts_multiple_inputs_and_enums() {
        let cli = Cli::try_parse_from([
            "chargefw", "-vv", "charges", "-i", "a.pdb", "b.pdb", "-o", "out.csv", "-m", "eem",
            "--format", "csv", "--bonds", "never",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Charges(args) = cli.command else {
            panic!("expected charges subcommand");
        };
        assert_eq!(args.input, vec![PathBuf::from("a.pdb"), PathBuf::from("b.pdb")]);
        assert_eq!(args.format, Some(FormatArg::Csv));
        assert_eq!(BondInference::from(args.bonds.unwrap()), BondInference::Never);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["chargefw", "-q", "-v", "methods"]);
        assert!(result.is_err());
    }

    #[test]
    fn charges_requires_input_and_output() {
        assert!(Cli::try_parse_from(["chargefw", "charges", "-o", "out.txt"]).is_err());
        assert!(Cli::try_parse_from(["chargefw", "charges", "-i", "a.pdb"]).is_err());
    }
}
