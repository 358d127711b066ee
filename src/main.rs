mod config;
mod context;
mod error;
mod http_client;
mod http_server;
mod logging;
mod ports;
mod services;
mod setlistfm;
mod spotify;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    context::RequestContext,
    http_client::build_client,
    http_server::state::{AppState, SharedPlaylistService},
    logging::init_tracing,
    ports::{
        artist::ArtistRepository, playlist::Playlist, playlist::PlaylistRepository,
        setlist::SetlistRepository, song::SongRepository,
    },
    services::{playlist::ConcurrentPlaylistService, throttle::ThrottledSongRepository},
    setlistfm::SetlistFmRepository,
    spotify::{
        SpotifyApi, SpotifyArtistRepository, SpotifyPlaylistRepository, SpotifySongRepository,
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "FESTWRAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `festwrap=debug`
    #[arg(long, default_value = "info", global = true, env = "FESTWRAP_LOG")]
    log_level: String,

    /// OTLP endpoint to export traces to
    #[arg(long, env = "FESTWRAP_OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// The port to run the server on, overrides the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Search Spotify for artists by name
    SearchArtist {
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: String,

        #[arg(short, long)]
        artist: String,

        /// Number of results to retrieve
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Create an empty playlist for a Spotify user
    CreatePlaylist {
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: String,

        #[arg(short, long)]
        user_id: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long)]
        public: bool,
    },
    /// Add the latest setlist of an artist to a playlist
    AddSetlist {
        #[arg(long, env = "SPOTIFY_TOKEN")]
        spotify_token: String,

        #[arg(short, long)]
        playlist_id: String,

        #[arg(short, long)]
        artist: String,

        /// Skip setlists with fewer songs, overrides the config file
        #[arg(short, long)]
        min_songs: Option<usize>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        "festwrap",
        args.otlp_endpoint.as_deref(),
        &args.log_level,
    )?;

    let result = run(args).await;

    if let Some(tracer_provider) = tracer_provider {
        if let Err(e) = tracer_provider.shutdown() {
            eprintln!("Failed to flush traces: {e}");
        }
    }

    result
}

async fn run(args: Args) -> Result<()> {
    tracing::debug!("Loading configuration");
    let config =
        Config::load(args.config.as_deref()).wrap_err("Failed to load festwrap config")?;

    match args.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let spotify = spotify_api(&config)?;
            let playlists = playlist_repository(&spotify);
            let state = AppState {
                playlist_service: playlist_service(&config, &spotify, Arc::clone(&playlists))?,
                playlist_repository: playlists,
                artist_repository: Arc::new(SpotifyArtistRepository::new(spotify))
                    as Arc<dyn ArtistRepository>,
            };
            http_server::app::start(port, Arc::new(state)).await?;
        }
        Commands::SearchArtist {
            spotify_token,
            artist,
            limit,
        } => {
            println!(
                "Searching for artist {artist} in Spotify, retrieving {limit} results at most"
            );
            let repository = SpotifyArtistRepository::new(spotify_api(&config)?);
            let ctx = RequestContext::new(spotify_token);
            let artists = repository
                .search_artist(&ctx, &artist, limit)
                .await
                .wrap_err("Error searching artist")?;
            for artist in artists {
                match artist.image_uri {
                    Some(image_uri) => println!("{} ({})", artist.name, image_uri),
                    None => println!("{}", artist.name),
                }
            }
        }
        Commands::CreatePlaylist {
            spotify_token,
            user_id,
            name,
            description,
            public,
        } => {
            let spotify = spotify_api(&config)?;
            let service = playlist_service(&config, &spotify, playlist_repository(&spotify))?;
            let ctx = RequestContext::new(spotify_token);
            let playlist = Playlist {
                name,
                description,
                is_public: public,
            };
            service
                .create_playlist(&ctx, &user_id, playlist)
                .await
                .wrap_err("Error creating playlist")?;
            println!("Playlist created");
        }
        Commands::AddSetlist {
            spotify_token,
            playlist_id,
            artist,
            min_songs,
        } => {
            let spotify = spotify_api(&config)?;
            let mut service = playlist_service(&config, &spotify, playlist_repository(&spotify))?;
            if let Some(min_songs) = min_songs {
                service.set_min_songs(min_songs);
            }
            let ctx = RequestContext::new(spotify_token);
            let cancel_on_ctrl_c = ctx.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_on_ctrl_c.cancel();
                }
            });
            ctx.run_until_cancelled(service.add_setlist(&ctx, &playlist_id, &artist))
                .await
                .wrap_err_with(|| format!("Error adding setlist of {artist}"))?;
            println!("Added setlist of {artist} to playlist {playlist_id}");
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}

fn spotify_api(config: &Config) -> Result<SpotifyApi> {
    let client = build_client(config.timeout(), config.max_conns_per_host)
        .wrap_err("Failed to build http client")?;
    SpotifyApi::new(client, &config.spotify_base_url).wrap_err("Invalid Spotify base url")
}

fn playlist_repository(spotify: &SpotifyApi) -> Arc<dyn PlaylistRepository> {
    Arc::new(SpotifyPlaylistRepository::new(spotify.clone()))
}

fn playlist_service(
    config: &Config,
    spotify: &SpotifyApi,
    playlists: Arc<dyn PlaylistRepository>,
) -> Result<SharedPlaylistService> {
    let client = build_client(config.timeout(), config.max_conns_per_host)
        .wrap_err("Failed to build http client")?;
    let api_key = config.setlistfm_api_key().unwrap_or_else(|e| {
        tracing::warn!("{e}, setlist lookups will be rejected by setlist.fm");
        ""
    });
    let setlists = SetlistFmRepository::new(client, &config.setlistfm_base_url, api_key)
        .wrap_err("Invalid setlist.fm base url")?
        .with_max_pages(config.setlistfm_max_pages);

    let songs = SpotifySongRepository::new(spotify.clone());
    let songs: Arc<dyn SongRepository> = match config.max_concurrent_lookups {
        Some(max_concurrent) => {
            tracing::info!("Limiting song lookups to {} at a time", max_concurrent);
            Arc::new(ThrottledSongRepository::new(songs, max_concurrent)) as Arc<dyn SongRepository>
        }
        None => Arc::new(songs) as Arc<dyn SongRepository>,
    };

    let mut service = ConcurrentPlaylistService::new(
        playlists,
        Arc::new(setlists) as Arc<dyn SetlistRepository>,
        songs,
    );
    service.set_min_songs(config.min_songs);
    Ok(service)
}
