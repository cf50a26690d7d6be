use clap::Parser;
use lifelog::cli::{
    handle_config_path, handle_config_set, handle_config_show, handle_delete, handle_list,
    handle_problem, handle_review, handle_search, handle_serve, handle_summary, handle_today, Cli,
    Commands, ConfigAction,
};
use lifelog::Config;

fn main() {
    let cli = Cli::parse();
    let data_dir = Config::resolve_data_dir(cli.dir);

    let result = match cli.command {
        Commands::Problem { text, no_ai } => handle_problem(data_dir, text, no_ai),
        Commands::List => handle_list(data_dir),
        Commands::Today => handle_today(data_dir),
        Commands::Search { query } => handle_search(data_dir, query),
        Commands::Delete { query, force } => handle_delete(data_dir, query, force),
        Commands::Review {
            all,
            last,
            from,
            to,
            topic,
        } => handle_review(data_dir, all, last, from, to, topic),
        Commands::Summary { period } => handle_summary(data_dir, period),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => handle_config_show(data_dir),
            ConfigAction::Set { key, value } => handle_config_set(data_dir, key, value),
            ConfigAction::Path => handle_config_path(data_dir),
        },
        Commands::Serve { port } => handle_serve(data_dir, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
