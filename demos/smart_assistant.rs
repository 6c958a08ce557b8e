//! Walk through both assistant workflows against the live Gemini API.
//!
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! cargo run --example smart_assistant -- "Stomach pain, nausea, diarrhea" path/to/report.pdf
//! ```

use smart_health::logging::{LogLevel, init_logging};
use smart_health::{DISCLAIMER, GeminiClient, Language, Navigator, SmartAssistant};
use std::env;

struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&mut self, path: &str) {
        println!("-> would navigate to {}", path);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogLevel::Info);

    let mut args = env::args().skip(1);
    let symptoms = args.next();
    let report = args.next();

    let client = GeminiClient::from_env()?;
    let mut assistant = SmartAssistant::new(client);
    println!("Note: {}\n", DISCLAIMER);

    match symptoms {
        Some(text) => {
            assistant.set_symptoms(text);
        }
        None => {
            assistant.apply_preset(0);
        }
    }
    println!("Symptoms: {}", assistant.symptoms());

    if assistant.submit_symptoms().await.is_ok() {
        println!("\n{}\n", assistant.symptom_response().unwrap_or_default());
        if assistant.find_doctor(&mut PrintNavigator).is_err() {
            println!("No specialty matched");
        }
    }

    if let Some(path) = report {
        if assistant.select_file_from_path(&path).is_ok() && assistant.submit_report().await.is_ok() {
            for language in Language::ALL {
                assistant.select_language(language);
                println!("--- {} ---\n{}\n", language, assistant.active_summary());
            }
        }
    }

    if let Some(message) = assistant.notification() {
        eprintln!("Error: {}", message);
    }

    Ok(())
}
