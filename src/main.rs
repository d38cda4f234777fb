use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use repofav::RepoId;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "repofav")]
#[command(about = "Browse GitHub repositories and keep your favorites in sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend base URL (defaults to the stored one, then http://localhost:8000)
    #[arg(long, global = true, env = "REPOFAV_BACKEND_URL", value_hint = ValueHint::Url)]
    backend_url: Option<String>,
    /// Use this token instead of the stored login
    #[arg(long, global = true, env = "REPOFAV_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the token
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and remember the token
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Show backend and login state
    Status,
    /// List a GitHub user's repositories, marking the saved ones
    #[command(short_flag = 's', visible_alias = "find")]
    Search {
        /// GitHub username
        user: String,
    },
    /// Save one of a user's repositories to favorites
    Save {
        /// GitHub username whose repositories to search
        user: String,
        /// Repository id or name
        repo: String,
    },
    /// Remove a repository from favorites
    Unsave {
        /// Repository id
        id: RepoId,
    },
    /// List saved favorites
    #[command(short_flag = 'f', visible_alias = "favs")]
    Favorites,
    /// Interactive session that keeps search results and favorites in sync
    Shell,
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn display_banner() {
    println!("repofav {}", env!("CARGO_PKG_VERSION"));
    println!("Browse GitHub repositories and bookmark the good ones.\n");
    println!("  repofav login              log in to the backend");
    println!("  repofav search <user>      list a user's repositories");
    println!("  repofav save <user> <repo> save one of them");
    println!("  repofav favorites          list what you've saved");
    println!("  repofav shell              interactive session");
    println!("\nRun 'repofav --help' for everything else.");
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        display_banner();
        return Ok(());
    };

    let ctx = Context::load(cli.backend_url.as_deref(), cli.token.as_deref())?;

    match command {
        Commands::Login { email, password } => commands::login(ctx, email, password).await,
        Commands::Register { email, password } => {
            commands::register(ctx, email, password).await
        }
        Commands::Logout => commands::logout(ctx),
        Commands::Status => commands::status(&ctx),
        Commands::Search { user } => commands::search_repos(&ctx, &user).await,
        Commands::Save { user, repo } => commands::save_repo(&ctx, &user, &repo).await,
        Commands::Unsave { id } => commands::unsave_repo(&ctx, id).await,
        Commands::Favorites => commands::list_favorites(&ctx).await,
        Commands::Shell => commands::run_shell(&ctx).await,
        Commands::Completions { shell } => {
            commands::generate_completions(shell);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = repofav::logging::init(cli.verbose) {
        eprintln!("Can't set up logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
