use clap::Parser;

use glyphreel::cli::{self, Args, Command, PlayOptions};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config_path = args.config.as_deref();

    let result = match args.command {
        Command::Convert {
            file,
            conversion,
            frame,
        } => cli::run_convert(&file, &conversion, frame, config_path),
        Command::Play {
            file,
            conversion,
            speed,
            no_loop,
            no_status,
        } => cli::run_play(
            &file,
            &conversion,
            PlayOptions {
                speed,
                no_loop,
                show_status: !no_status,
            },
            config_path,
        ),
        Command::Charsets => {
            cli::list_charsets();
            Ok(())
        }
        Command::Config { action } => cli::handle_config_action(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
