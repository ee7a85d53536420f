use chrono::{Local, NaiveDate};
use lectura::{EngineConfig, ReadingEngine, StaticProvider};
use std::env;

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("  {} plan [YYYY-MM-DD]", program);
    eprintln!("  {} resolve <book name>", program);
    eprintln!("  {} read <chapters.json> [book] [chapter]", program);
    eprintln!("  {} verse <chapters.json> <book> <chapter> <verses>", program);
    std::process::exit(1);
}

fn parse_chapter(program: &str, raw: &str) -> u32 {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("ERROR: Invalid chapter number: {}", raw);
        usage(program)
    })
}

fn load_engine(path: &str) -> ReadingEngine<StaticProvider> {
    match StaticProvider::from_json_file(path) {
        Ok(provider) => ReadingEngine::new(provider, EngineConfig::from_env()),
        Err(e) => {
            eprintln!("ERROR: Failed to load chapter catalog {}", path);
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("lectura");
    if args.len() < 2 {
        usage(program);
    }

    match args[1].as_str() {
        "plan" => {
            let config = EngineConfig::from_env();
            let date = match args.get(2) {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
                    eprintln!("ERROR: Invalid date (expected YYYY-MM-DD): {}", raw);
                    usage(program)
                }),
                None => Local::now().date_naive(),
            };
            let engine = ReadingEngine::new(StaticProvider::new(), config);
            let reference = engine.get_chapter_for_date(date);
            println!("{}: {}", date, reference);
            println!("  Plan day: {}", engine.plan().day_number(date));
        }
        "resolve" => {
            if args.len() < 3 {
                usage(program);
            }
            let input = args[2..].join(" ");
            println!("{}", lectura::resolve_book_name(&input));
        }
        "read" => {
            let Some(path) = args.get(2) else { usage(program) };
            let engine = load_engine(path);
            let book = args.get(3).map(String::as_str);
            let chapter = args.get(4).map(|raw| parse_chapter(program, raw));
            let content = engine.fetch_chapter(book, chapter).await;
            println!("{}", content.reference);
            println!("{}", "=".repeat(60));
            println!("{}", content.text);
            if content.is_error() {
                std::process::exit(1);
            }
        }
        "verse" => {
            if args.len() < 6 {
                usage(program);
            }
            let engine = load_engine(&args[2]);
            let chapter = parse_chapter(program, &args[4]);
            println!("{}", engine.get_verse_text(&args[3], chapter, &args[5]).await);
        }
        other => {
            eprintln!("ERROR: Unknown command: {}", other);
            usage(program);
        }
    }
}
