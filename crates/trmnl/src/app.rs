use clap::{Arg, ArgAction, Command};

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output as JSON")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("trmnl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch the current TRMNL screen from the terminal")
        .long_about("trmnl polls the TRMNL current screen API with your device access token, downloads the screen image it points at, and re-polls at the refresh rate the API reports.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Current screen endpoint (overrides config)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("watch")
                .about("Keep the screen up to date and print every state change until Ctrl-C")
                .arg(json_arg().help("Print each state change as one JSON line")),
        )
        .subcommand(
            Command::new("refresh")
                .about("Refresh the screen once and print the result")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("set-token")
                .about("Save the device access token and refresh immediately")
                .arg(
                    Arg::new("token")
                        .help("Access token from the TRMNL dashboard (empty to clear)")
                        .required(true)
                        .allow_hyphen_values(true)
                        .index(1),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("status")
                .about("Show saved settings")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("save-image")
                .about("Refresh once and write the screen image to a file")
                .arg(
                    Arg::new("path")
                        .help("Destination file")
                        .required(true)
                        .index(1),
                ),
        )
}
