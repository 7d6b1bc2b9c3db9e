// Command-line front end over `Studio`

use crate::audio::PreviewPlayer;
use crate::config;
use crate::session::SessionError;
use crate::tts::Emotion;
use crate::voices::{self, ContentStyle, Gender};
use crate::Studio;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "playback")]
type Sink = crate::audio::playback::CpalSink;
#[cfg(not(feature = "playback"))]
type Sink = crate::audio::NullSink;

#[derive(Parser, Debug)]
#[command(name = "voice-studio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Arabic text-to-speech studio")]
struct Args {
    /// Directory holding config.json and saved projects
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate speech and write it as WAV
    Generate(GenerateArgs),
    /// Speak a catalog voice's sample sentence
    Preview {
        /// Voice id (v1..v5)
        voice: String,
    },
    /// List catalog voices
    Voices {
        #[arg(long)]
        search: Option<String>,
        /// male or female
        #[arg(long)]
        gender: Option<String>,
    },
    /// List content styles and their presets
    Styles,
    /// Manage saved projects
    Projects {
        #[command(subcommand)]
        action: ProjectsCommand,
    },
    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Text to speak
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Start from a saved project
    #[arg(long)]
    project: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    voice: Option<String>,

    /// Content style preset, applied before individual overrides
    #[arg(long)]
    style: Option<String>,

    #[arg(long)]
    emotion: Option<String>,

    /// Emotion level 0-100
    #[arg(long)]
    level: Option<f32>,

    #[arg(long)]
    pitch: Option<f32>,

    #[arg(long)]
    speed: Option<f32>,

    #[arg(long)]
    intensity: Option<f32>,

    /// Output directory for the WAV file
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Save the project after generating
    #[arg(long)]
    save: bool,

    /// Play the result
    #[arg(long)]
    play: bool,
}

#[derive(Subcommand, Debug)]
enum ProjectsCommand {
    List,
    Show { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    SetKey { key: String },
    SetName { name: String },
    SetModel { model: String },
    SetTimeout { secs: u64 },
    SetVoice { id: String },
    SetOutputDir { dir: PathBuf },
}

/// Binary entry point.
pub fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    setup_tracing();

    let args = Args::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("voice_studio_lib=info,voice_studio=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

async fn async_main(args: Args) -> Result<()> {
    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => config::default_dir().map_err(anyhow::Error::msg)?,
    };
    let mut studio = Studio::open(&data_dir)?;

    match args.command {
        Command::Generate(generate) => run_generate(&mut studio, generate).await,
        Command::Preview { voice } => run_preview(&studio, &voice).await,
        Command::Voices { search, gender } => {
            let gender = gender.as_deref().map(parse_gender).transpose()?;
            for voice in voices::search_voices(search.as_deref().unwrap_or(""), gender) {
                println!(
                    "{}  {:<6} {:<7} {:?}  {}  [{}]",
                    voice.id,
                    voice.name,
                    voice.gemini_voice_name,
                    voice.gender,
                    voice.description,
                    voice.tags.join(", ")
                );
            }
            Ok(())
        }
        Command::Styles => {
            for style in ContentStyle::ALL {
                let preset = style.preset();
                println!(
                    "{:<12} {:<13} emotion={} level={} speed={} intensity={} voice={}",
                    format!("{:?}", style),
                    style.label(),
                    display(preset.emotion.map(|e| e.label())),
                    display(preset.emotion_level),
                    display(preset.speed),
                    display(preset.intensity),
                    display(preset.voice_id)
                );
            }
            Ok(())
        }
        Command::Projects { action } => run_projects(&mut studio, action),
        Command::Config { action } => run_config(&mut studio, action),
    }
}

async fn run_generate(studio: &mut Studio, args: GenerateArgs) -> Result<()> {
    let mut project = match args.project.as_deref() {
        Some(id) => studio
            .project(id)
            .cloned()
            .ok_or_else(|| anyhow!("Project not found: {}", id))?,
        None => studio.new_project(),
    };

    if let Some(path) = &args.file {
        project.text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    } else if let Some(text) = args.text {
        project.text = text;
    }
    if let Some(title) = args.title {
        project.title = title;
    }
    if let Some(style) = args.style.as_deref() {
        let style = ContentStyle::parse(style).ok_or_else(|| anyhow!("Unknown style: {}", style))?;
        studio.apply_style(&mut project, style);
    }
    if let Some(voice) = args.voice {
        if voices::find_voice(&voice).is_none() {
            bail!("Unknown voice: {}", voice);
        }
        project.voice_id = voice;
    }
    if let Some(emotion) = args.emotion.as_deref() {
        project.settings.emotion =
            Emotion::parse(emotion).ok_or_else(|| anyhow!("Unknown emotion: {}", emotion))?;
    }
    if let Some(level) = args.level {
        project.settings.emotion_level = level;
    }
    if let Some(pitch) = args.pitch {
        project.settings.pitch = pitch;
    }
    if let Some(speed) = args.speed {
        project.settings.speed = speed;
    }
    if let Some(intensity) = args.intensity {
        project.settings.intensity = intensity;
    }

    let cancel = cancel_on_ctrl_c();
    let clip = match studio.generate(&project, &cancel).await {
        Ok(clip) => clip,
        Err(e) => return Err(user_facing(e)),
    };

    let path = studio
        .download(&project.title, args.out.as_deref())
        .map_err(user_facing)?;
    println!(
        "{} ({:.2}s, {} bytes)",
        path.display(),
        clip.buffer.duration_secs,
        clip.wav.len()
    );

    if args.save {
        let saved = studio.save_project(&project)?;
        println!("Saved project {}", saved.id);
    }

    if args.play {
        let mut player = PreviewPlayer::new(Sink::default());
        player.play(&clip.buffer)?;
        wait_for_playback(clip.buffer.duration_secs, &cancel).await;
        player.stop();
    }

    Ok(())
}

async fn run_preview(studio: &Studio, voice_id: &str) -> Result<()> {
    let voice = voices::find_voice(voice_id).ok_or_else(|| anyhow!("Unknown voice: {}", voice_id))?;
    let cancel = cancel_on_ctrl_c();
    let mut preview = studio.preview_player(Sink::default());

    let duration = preview.preview(voice, &cancel).await.map_err(|e| {
        tracing::error!("Preview failed: {}", e);
        anyhow!("عذراً، فشل تشغيل المعاينة. يرجى المحاولة مرة أخرى. ({})", e)
    })?;
    println!("{}: {} ({:.2}s)", voice.name, voice.preview_text, duration);

    wait_for_playback(duration, &cancel).await;
    preview.stop();
    Ok(())
}

fn run_projects(studio: &mut Studio, action: ProjectsCommand) -> Result<()> {
    match action {
        ProjectsCommand::List => {
            if studio.projects().is_empty() {
                println!("No saved projects");
            }
            for project in studio.projects() {
                println!(
                    "{}  {}  {}  ~{}s  {} words  voice={}",
                    project.id,
                    format_date(project.created_at),
                    project.title,
                    project.estimated_seconds(),
                    project.word_count(),
                    project.voice_id
                );
            }
        }
        ProjectsCommand::Show { id } => {
            let project = studio
                .project(&id)
                .ok_or_else(|| anyhow!("Project not found: {}", id))?;
            println!("{}", serde_json::to_string_pretty(project)?);
        }
        ProjectsCommand::Delete { id } => {
            studio.delete_project(&id)?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn run_config(studio: &mut Studio, action: ConfigCommand) -> Result<()> {
    let mut updated = studio.config().clone();
    match action {
        ConfigCommand::Show => {
            let summary = config::summary(studio.config());
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }
        ConfigCommand::SetKey { key } => updated.set_api_key(&key),
        ConfigCommand::SetName { name } => updated.user_name = name.trim().to_string(),
        ConfigCommand::SetModel { model } => updated.model = model.trim().to_string(),
        ConfigCommand::SetTimeout { secs } => {
            updated.request_timeout_secs = config::normalize_timeout(secs)
        }
        ConfigCommand::SetVoice { id } => updated.default_voice_id = config::normalize_voice_id(&id),
        ConfigCommand::SetOutputDir { dir } => updated.output_dir = Some(dir),
    }

    studio.update_config(updated)?;
    println!("Settings saved");
    Ok(())
}

fn user_facing(err: SessionError) -> anyhow::Error {
    anyhow!("{} ({})", err.user_message(), err)
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

async fn wait_for_playback(duration_secs: f64, cancel: &CancellationToken) {
    let wait = Duration::from_secs_f64(duration_secs.max(0.0)) + Duration::from_millis(100);
    tokio::select! {
        _ = tokio::time::sleep(wait) => {}
        _ = cancel.cancelled() => {}
    }
}

fn parse_gender(input: &str) -> Result<Gender> {
    match input.trim().to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Gender::Male),
        "female" | "f" => Ok(Gender::Female),
        other => bail!("Unknown gender: {}", other),
    }
}

fn format_date(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn display<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "voice-studio",
            "generate",
            "مرحبا",
            "--voice",
            "v1",
            "--style",
            "advertising",
            "--level",
            "90",
        ])
        .unwrap();

        match args.command {
            Command::Generate(generate) => {
                assert_eq!(generate.text.as_deref(), Some("مرحبا"));
                assert_eq!(generate.level, Some(90.0));
                assert_eq!(generate.style.as_deref(), Some("advertising"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_text_and_file_conflict() {
        let result = Args::try_parse_from([
            "voice-studio",
            "generate",
            "text",
            "--file",
            "input.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_gender_and_date() {
        assert_eq!(parse_gender("F").unwrap(), Gender::Female);
        assert!(parse_gender("x").is_err());
        assert_eq!(format_date(0), "1970-01-01");
    }
}
