/// ymusic - command-line client for Yandex Music
mod config;
mod error;
mod output;

use clap::{Parser, Subcommand};
use crate::config::CliConfig;
use crate::error::CliError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ymusic_client::MusicClient;
use ymusic_core::{SearchType, TrackKey, TrackResolver};
use ymusic_ynison::{SyncEvent, YnisonClient};

#[derive(Parser)]
#[command(name = "ymusic")]
#[command(about = "Yandex Music command-line client", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./ymusic.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// OAuth token, overrides the configured one
    #[arg(long, env = "YMUSIC_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account behind the token
    Whoami,
    /// Search the catalog
    Search {
        /// Query text
        text: String,
        /// all, track, album, artist, playlist, ...
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: SearchType,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Show tracks by id
    Track {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print a direct download link for a track
    Link {
        id: String,
        /// Album the track belongs to
        #[arg(long)]
        album: Option<String>,
    },
    /// Show an album with its tracks
    Album { id: String },
    /// Show an artist's popular tracks
    Artist { id: String },
    /// List liked tracks
    Liked {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List the account's playlists
    Playlists,
    /// Show what is playing on the account's devices
    NowPlaying {
        /// Keep printing updates until interrupted
        #[arg(short, long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ymusic=info,ymusic_client=info,ymusic_ynison=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if cli.token.is_some() {
        config.api.token = cli.token;
    }
    config.validate()?;

    let client = MusicClient::new(config.client_config())?;

    match cli.command {
        Commands::Whoami => whoami(&client).await?,
        Commands::Search {
            text,
            kind,
            page,
            page_size,
        } => search(&client, &text, kind, page, page_size).await?,
        Commands::Track { ids } => {
            for track in client.tracks().get(&ids).await? {
                println!("{}", output::track(&track));
            }
        }
        Commands::Link { id, album } => {
            let link = client.tracks().file_link(&TrackKey::new(id, album)).await?;
            println!("{link}");
        }
        Commands::Album { id } => {
            let album = client.albums().get(&id).await?;
            println!("{}", output::album(&album));
            for (n, track) in album.tracks().enumerate() {
                println!("{:>3}. {}", n + 1, output::track(track));
            }
        }
        Commands::Artist { id } => {
            let info = client.artists().brief_info(&id).await?;
            if let Some(artist) = &info.artist {
                println!("{}", output::artist(artist));
            }
            for track in &info.popular_tracks {
                println!("  {}", output::track(track));
            }
        }
        Commands::Liked { limit } => liked(&client, limit).await?,
        Commands::Playlists => {
            let uid = identify(&client).await?;
            for playlist in client.playlists().list(&uid).await? {
                println!("{}", output::playlist(&playlist));
            }
        }
        Commands::NowPlaying { watch } => now_playing(&config, client, watch).await?,
    }

    Ok(())
}

/// Resolve the account uid, which user-scoped endpoints need
async fn identify(client: &MusicClient) -> anyhow::Result<String> {
    let status = client.account().status().await?;
    if !status.is_authorized() {
        anyhow::bail!("token is not authorized");
    }
    Ok(status.account.uid)
}

async fn whoami(client: &MusicClient) -> anyhow::Result<()> {
    let status = client.account().status().await?;
    if !status.is_authorized() {
        println!("anonymous");
        return Ok(());
    }

    let account = &status.account;
    println!("{} (uid {})", account.login, account.uid);
    if let Some(name) = &account.display_name {
        println!("name: {name}");
    }
    if let Some(plus) = &status.plus {
        println!("plus: {}", plus.has_plus);
    }
    Ok(())
}

async fn search(
    client: &MusicClient,
    text: &str,
    kind: SearchType,
    page: u32,
    page_size: u32,
) -> anyhow::Result<()> {
    let results = client.search().search(text, kind, page, page_size).await?;

    if let Some(corrected) = results.misspell_result.as_deref() {
        println!("(showing results for {corrected:?})");
    }
    if let Some(tracks) = &results.tracks {
        println!("Tracks ({}):", tracks.total);
        for track in &tracks.results {
            println!("  {}", output::track(track));
        }
    }
    if let Some(albums) = &results.albums {
        println!("Albums ({}):", albums.total);
        for album in &albums.results {
            println!("  {}", output::album(album));
        }
    }
    if let Some(artists) = &results.artists {
        println!("Artists ({}):", artists.total);
        for artist in &artists.results {
            println!("  {}", output::artist(artist));
        }
    }
    if let Some(playlists) = &results.playlists {
        println!("Playlists ({}):", playlists.total);
        for playlist in &playlists.results {
            println!("  {}", output::playlist(playlist));
        }
    }
    Ok(())
}

async fn liked(client: &MusicClient, limit: usize) -> anyhow::Result<()> {
    identify(client).await?;
    let liked = client.library().liked_tracks().await?;
    let ids: Vec<String> = liked
        .keys()
        .into_iter()
        .take(limit)
        .map(|key| key.to_string())
        .collect();

    if ids.is_empty() {
        println!("no liked tracks");
        return Ok(());
    }

    for track in client.tracks().get(&ids).await? {
        println!("{}", output::track(&track));
    }
    Ok(())
}

async fn now_playing(config: &CliConfig, client: MusicClient, watch: bool) -> anyhow::Result<()> {
    let token = config.token()?.to_string();
    let resolver: Arc<dyn TrackResolver> = Arc::new(client);
    let ynison = YnisonClient::with_config(token, config.identity(), resolver, config.ynison_config());

    let mut events = ynison.subscribe();
    ynison.connect().await?;

    let wait = config.ynison.snapshot_wait_secs;
    let result = if watch {
        watch_events(&ynison, &mut events).await
    } else {
        match tokio::time::timeout(Duration::from_secs(wait), next_snapshot(&mut events)).await {
            Ok(Ok(())) => print_current(&ynison).await,
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CliError::NoSnapshot(wait).into()),
        }
    };

    ynison.close().await;
    result
}

async fn next_snapshot(
    events: &mut tokio::sync::broadcast::Receiver<SyncEvent>,
) -> anyhow::Result<()> {
    loop {
        match events.recv().await? {
            SyncEvent::Snapshot(_) => return Ok(()),
            SyncEvent::Closed(reason) => anyhow::bail!("connection closed: {reason}"),
        }
    }
}

async fn watch_events(
    ynison: &YnisonClient,
    events: &mut tokio::sync::broadcast::Receiver<SyncEvent>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            event = events.recv() => match event {
                Ok(SyncEvent::Snapshot(_)) => print_current(ynison).await?,
                Ok(SyncEvent::Closed(reason)) => anyhow::bail!("connection closed: {reason}"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Fell behind on player updates");
                }
                Err(e) => return Err(e.into()),
            },
        }
    }
}

async fn print_current(ynison: &YnisonClient) -> anyhow::Result<()> {
    let Some(snapshot) = ynison.snapshot().await else {
        return Ok(());
    };

    match ynison.current_track().await? {
        Some(track) => println!("{}", output::track(&track)),
        None => match ymusic_ynison::current_playable(&snapshot) {
            Some(item) if !item.title.is_empty() => println!("{}", item.title),
            _ => println!("nothing playing"),
        },
    }

    if let Some(status) = snapshot.player_state.as_ref().and_then(|s| s.status.as_ref()) {
        println!("  {}", output::status(status));
    }
    for line in output::devices(&snapshot) {
        println!("  {line}");
    }
    Ok(())
}
