//! `movies`: command-line front end for the catalog API

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use client::{
    ApiClient, ClientError, ClientSession, MovieChanges, MoviePage,
    api_client::DEFAULT_API_URL,
    debounce::{Debouncer, SEARCH_DEBOUNCE},
};

/// Browse and manage the movie catalog
#[derive(Parser, Debug)]
#[command(name = "movies", version, long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "CATALOG_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Where the login is kept between runs
    #[arg(long, env = "CATALOG_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored login
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List one page of movies
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 8)]
        limit: u32,
        /// Only titles containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Search interactively: each line typed refines the listing
    Browse {
        #[arg(long, default_value_t = 8)]
        limit: u32,
    },
    /// Show one movie
    Show { id: i32 },
    /// Add a movie
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: i32,
        /// Image file to upload as the poster
        #[arg(long)]
        poster: Option<PathBuf>,
    },
    /// Change fields of a movie
    Edit {
        id: i32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        poster: Option<PathBuf>,
    },
    /// Delete a movie
    Delete { id: i32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session_file = cli
        .session_file
        .clone()
        .unwrap_or_else(ClientSession::default_path);

    match cli.command {
        Command::Register { email, password } => {
            let client = ApiClient::new(&cli.api_url)?;
            let user = client.register(&email, &password).await?;
            ClientSession::capture(&client, user.clone())?.save(&session_file)?;
            println!("Registered and logged in as {}", user.email);
        }
        Command::Login { email, password } => {
            let client = ApiClient::new(&cli.api_url)?;
            let user = client.login(&email, &password).await?;
            ClientSession::capture(&client, user.clone())?.save(&session_file)?;
            println!("Logged in as {}", user.email);
        }
        Command::Logout => {
            if let Some(session) = ClientSession::load(&session_file)? {
                session.client()?.logout().await;
            }
            ClientSession::clear(&session_file)?;
            println!("Logged out");
        }
        Command::Whoami => match ClientSession::load(&session_file)? {
            Some(ClientSession {
                user: Some(user),
                api_url,
                ..
            }) => println!("{} ({}) at {}", user.email, user.role, api_url),
            _ => println!("Not logged in"),
        },
        Command::List {
            page,
            limit,
            search,
        } => {
            let client = session_client(&session_file)?;
            let listing = guard(client.list(page, limit, search.as_deref()).await)?;
            print_page(&listing, search.as_deref());
        }
        Command::Browse { limit } => {
            let client = session_client(&session_file)?;
            browse(&client, limit).await?;
        }
        Command::Show { id } => {
            let client = session_client(&session_file)?;
            let movie = guard(client.get(id).await)?;
            println!("#{} {} ({})", movie.id, movie.title, movie.publishing_year);
            if let Some(poster) = &movie.poster {
                println!("poster:  {}{}", client.base_url(), poster);
            }
            println!("created: {}", movie.created_at.to_rfc3339());
            println!("updated: {}", movie.updated_at.to_rfc3339());
        }
        Command::Create {
            title,
            year,
            poster,
        } => {
            let client = session_client(&session_file)?;
            let movie = guard(client.create(&title, year, poster.as_deref()).await)?;
            println!("Created #{} {}", movie.id, movie.title);
        }
        Command::Edit {
            id,
            title,
            year,
            poster,
        } => {
            let changes = MovieChanges {
                title,
                publishing_year: year,
            };
            if changes.is_empty() && poster.is_none() {
                bail!("Nothing to change: pass --title, --year or --poster");
            }

            let client = session_client(&session_file)?;
            let movie = guard(client.update(id, &changes, poster.as_deref()).await)?;
            println!(
                "Updated #{} {} ({})",
                movie.id, movie.title, movie.publishing_year
            );
        }
        Command::Delete { id } => {
            let client = session_client(&session_file)?;
            let message = guard(client.delete(id).await)?;
            println!("{}", message);
        }
    }

    Ok(())
}

fn session_client(path: &Path) -> Result<ApiClient> {
    let session = ClientSession::load(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?
        .ok_or(ClientError::NotLoggedIn)
        .context("Run `movies login` first")?;
    Ok(session.client()?)
}

/// Turn an expired or missing session into a hint
fn guard<T>(result: Result<T, ClientError>) -> Result<T> {
    match result {
        Err(e) if e.status() == Some(401) => {
            Err(e).context("Session expired or invalid; run `movies login` again")
        }
        other => Ok(other?),
    }
}

async fn browse(client: &ApiClient, limit: u32) -> Result<()> {
    let (debouncer, mut settled) = Debouncer::<String>::spawn(SEARCH_DEBOUNCE);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer = Some(debouncer);

    print_page(&guard(client.list(1, limit, None).await)?, None);
    eprintln!("Type to search, Ctrl-D to quit");

    loop {
        tokio::select! {
            line = lines.next_line(), if debouncer.is_some() => {
                match line? {
                    Some(line) => {
                        if let Some(debouncer) = &debouncer {
                            debouncer.push(line.trim().to_string());
                        }
                    }
                    // EOF: let the last term settle, then stop
                    None => debouncer = None,
                }
            }
            term = settled.recv() => {
                let Some(term) = term else { break };
                let search = Some(term.as_str()).filter(|t| !t.is_empty());
                match client.list(1, limit, search).await {
                    Ok(listing) => print_page(&listing, search),
                    Err(e) => eprintln!("Search failed: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn print_page(listing: &MoviePage, search: Option<&str>) {
    if let Some(term) = search {
        println!("Results for \"{}\":", term);
    }
    if listing.movies.is_empty() {
        println!("No movies found");
    }
    for movie in &listing.movies {
        let poster = if movie.poster.is_some() { " [poster]" } else { "" };
        println!(
            "#{:<5} {} ({}){}",
            movie.id, movie.title, movie.publishing_year, poster
        );
    }
    println!(
        "Page {} of {} ({} movies)",
        listing.page,
        listing.total_pages.max(1),
        listing.total
    );
}
