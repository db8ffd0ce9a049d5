use channelscope::{ChannelResolver, Config, HttpTransport, ResolveOptions, Resolution};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let include_top_comments = if let Some(pos) = args.iter().position(|a| a == "--comments") {
        args.remove(pos);
        true
    } else {
        false
    };
    if args.is_empty() {
        eprintln!("usage: channelscope-cli [--comments] <query>...");
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let resolver = ChannelResolver::new(&config, Arc::new(HttpTransport::new()), tx);

    let printer = tokio::spawn(async move {
        let mut last = None;
        while let Some(state) = rx.recv().await {
            eprintln!(
                "==> {} | videos: {} | loading: {} | error: {}",
                state.channel_name.as_deref().unwrap_or("-"),
                state.videos.len(),
                state.is_loading,
                state.error.as_deref().unwrap_or("-"),
            );
            last = Some(state);
        }
        last
    });

    let options = ResolveOptions {
        include_top_comments,
    };
    for query in &args {
        match resolver.resolve(query, options).await {
            Resolution::Video { video_id } => {
                eprintln!("query {query:?} is a video URL; would navigate to video {video_id}");
            }
            Resolution::Cleared => {
                eprintln!("query {query:?} was empty; state cleared");
            }
            Resolution::Channel => {}
        }
    }

    drop(resolver);
    if let Some(state) = printer.await? {
        for video in state.videos.iter().take(25) {
            println!(
                "{:>12}  {:>10}  {}  {}",
                video.view_count,
                video.like_count,
                video
                    .published_at
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                video.title,
            );
            if let Some(comment) = &video.top_comment {
                println!("              \"{}\"", comment.text);
            }
        }
        if let Some(error) = state.error {
            eyre::bail!(error);
        }
    }

    Ok(())
}
