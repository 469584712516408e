// Lyrebird performance demo — CLI entry point.
//
// Feeds a line of Sheet Text through the full pipeline at a simulated
// typing cadence, prints the output buffer gauge as the session runs, and
// writes the rendered performance to a WAV file.
//
// Usage:
//   cargo run -p lyrebird_engine --bin perform -- [output.wav] [--text STRING]
//     [--song FILE.json] [--difficulty NAME] [--voice NAME] [--seed N] [--cps N]
//
// With `--song`, the song's sheet text is typed, its difficulty preset is
// used, and its expected tokens are loaded for accuracy scoring.
//
// Difficulties: easy, medium, hard, expert
// Voices: bass, robot, alto, whisper, default, soprano

use lyrebird_engine::config::EngineConfig;
use lyrebird_engine::difficulty::Difficulty;
use lyrebird_engine::output::Zone;
use lyrebird_engine::performance::Performance;
use lyrebird_text::song::load_song;
use lyrebird_voice::profile::VoiceProfile;
use lyrebird_voice::wav::write_wav;
use std::cell::RefCell;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

const DEMO_TEXT: &str = "the SUN... is falling _down_ and RISING [again]";

/// Milliseconds per tick — the reference ~30 Hz external clock.
const TICK_MS: u64 = 33;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("performance.wav");
    let voice_name: String = parse_flag(&args, "--voice").unwrap_or_else(|| "default".to_string());
    let seed: u64 = parse_flag(&args, "--seed").unwrap_or(0);
    // Simulated typing speed, characters per second.
    let cps: u64 = parse_flag(&args, "--cps").unwrap_or(8).max(1);

    // A song file supplies text, difficulty, and the expected tokens;
    // explicit flags override its text/difficulty.
    let song = match parse_flag::<String>(&args, "--song") {
        Some(path) => match load_song(Path::new(&path)) {
            Ok(song) => Some(song),
            Err(e) => {
                eprintln!("failed to load song {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let text: String = parse_flag(&args, "--text")
        .or_else(|| song.as_ref().map(|s| s.sheet_text.clone()))
        .unwrap_or_else(|| DEMO_TEXT.to_string());
    let difficulty_name: String = parse_flag(&args, "--difficulty")
        .or_else(|| song.as_ref().map(|s| s.difficulty.clone()))
        .unwrap_or_else(|| "medium".to_string());

    let difficulty = match Difficulty::by_name(&difficulty_name) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let voice = match VoiceProfile::by_name(&voice_name) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    println!("=== Lyrebird Performance ===");
    if let Some(song) = &song {
        println!("Song: {} ({} BPM)", song.title, song.bpm);
    }
    println!("Sheet Text: {text:?}");
    println!("Difficulty: {} | Voice: {} | Seed: {seed}", difficulty.name, voice.name);
    println!("Output: {output_path}");
    println!();

    let config = EngineConfig {
        difficulty,
        noise_seed: seed,
        ..EngineConfig::default()
    };
    let sample_rate = config.sample_rate;

    let mut perf = match Performance::with_voice(config, voice) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(song) = song {
        perf.load_expected(song.tokens);
    }

    // Collect every rendered buffer into one take.
    let pcm: Rc<RefCell<Vec<i16>>> = Rc::new(RefCell::new(Vec::new()));
    let pcm_handle = Rc::clone(&pcm);
    perf.set_sink(Box::new(move |buffer| {
        pcm_handle.borrow_mut().extend_from_slice(buffer);
    }));

    println!("[1/3] Typing at ~{cps} chars/sec...");
    let chars: Vec<char> = text.chars().collect();
    let ticks_per_char = (1000 / cps).max(1).div_ceil(TICK_MS).max(1);
    let mut tick_count: u64 = 0;
    for ch in &chars {
        perf.feed(
            *ch,
            lyrebird_engine::performance::Modifiers {
                shift: ch.is_uppercase(),
                ..Default::default()
            },
        );
        for _ in 0..ticks_per_char {
            let snapshot = perf.tick(TICK_MS);
            tick_count += 1;
            if tick_count % 10 == 0 {
                print_gauge(&snapshot.output_zone, snapshot.output_level, snapshot.score);
            }
        }
    }

    println!("[2/3] Draining the buffer...");
    while perf.output_len() > 0 || perf.input_len() > 0 {
        let snapshot = perf.tick(TICK_MS);
        tick_count += 1;
        if tick_count % 10 == 0 {
            print_gauge(&snapshot.output_zone, snapshot.output_level, snapshot.score);
        }
    }

    println!("[3/3] Writing WAV...");
    let samples = pcm.borrow();
    if let Err(e) = write_wav(Path::new(output_path), &samples, sample_rate) {
        eprintln!("failed to write {output_path}: {e}");
        return ExitCode::FAILURE;
    }

    println!();
    println!(
        "Done: {} samples ({:.2}s) over {tick_count} ticks.",
        samples.len(),
        samples.len() as f64 / f64::from(sample_rate)
    );
    println!(
        "Score: {} (grade {}) | accuracy {:.0}% | overflow in/out: {}/{}",
        perf.score(),
        perf.grade(),
        perf.accuracy() * 100.0,
        perf.input_overflow(),
        perf.output_overflow()
    );
    ExitCode::SUCCESS
}

/// Render a buffer gauge line: zone tag, bar, level, score.
fn print_gauge(zone: &Zone, level: f32, score: i64) {
    let width = 20;
    let filled = (level * width as f32).round() as usize;
    let bar: String = "\u{2588}".repeat(filled.min(width)) + &"\u{2591}".repeat(width - filled.min(width));
    let tag = match zone {
        Zone::Under => "under  ",
        Zone::Optimal => "optimal",
        Zone::Over => "over   ",
    };
    println!("  [{bar}] {tag} level {level:.2}  score {score}");
}

/// Parse `--name value` style flags from raw args.
fn parse_flag<T: std::str::FromStr>(args: &[String], name: &str) -> Option<T> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
