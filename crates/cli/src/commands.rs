//! Clap command definition.
//!
//! Builds the `clap::Command` for the `sff-migrate` shell. Kept separate
//! from `main.rs` so the argument surface can be asserted in tests without
//! touching the filesystem.

use clap::{Arg, Command};

/// Build the complete CLI command.
pub fn build_cli() -> Command {
    Command::new("sff-migrate")
        .about("Upgrade EMDB-SFF segmentation documents to a newer schema version")
        .arg(
            Arg::new("infile")
                .value_name("FILE")
                .required_unless_present("show-versions")
                .help("Segmentation document to migrate"),
        )
        .arg(
            Arg::new("target-version")
                .long("target-version")
                .short('t')
                .value_name("VERSION")
                .help("Schema version to migrate to (default: newest supported)"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .value_name("PATH")
                .help("Output path (default: <FILE stem>_<target version>.<ext>)"),
        )
        .arg(
            Arg::new("show-versions")
                .long("show-versions")
                .short('s')
                .action(clap::ArgAction::SetTrue)
                .help("List the supported schema versions and exit"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(clap::ArgAction::SetTrue)
                .help("Verbose progress output"),
        )
}
