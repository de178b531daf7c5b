//! RBS ARXML inspector
//!
//! Prints what the extractor finds in an RBS file:
//! - PDUs with their length, inferred cycle time and signal count
//! - Signals that have no known length
//! - Signals whose compu method could not be resolved

use pdu_metadata::{ExtractorConfig, MetadataExtractor, NO_COMPU_METHOD};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <rbs_arxml_path>", args[0]);
        println!("\nExample:");
        println!("  {} path/to/RBS.arxml", args[0]);
        return;
    }

    let file_path = Path::new(&args[1]);

    println!("\n═══════════════════════════════════════════════");
    println!("  RBS ARXML Inspector");
    println!("═══════════════════════════════════════════════");
    println!("\nFile: {:?}\n", file_path);

    let mut extractor = MetadataExtractor::with_config(ExtractorConfig::new());
    if let Err(e) = extractor.load_rbs(file_path) {
        println!("❌ ERROR: {}", e);
        return;
    }

    let pdus = match extractor.pdus() {
        Ok(pdus) => pdus,
        Err(e) => {
            println!("❌ ERROR: {}", e);
            return;
        }
    };

    let mut unsized_signals = 0;
    let mut unresolved_compu = 0;

    for (name, pdu) in &pdus {
        let cycle = if pdu.cycle_time == "0.0" {
            "no cycle suffix".to_string()
        } else {
            format!("{} s", pdu.cycle_time)
        };
        println!(
            "  {:<40} {:>5} bits  {:<16} {} signals",
            name, pdu.length, cycle, pdu.total_signals
        );

        for (signal_name, layout) in &pdu.signals {
            if layout.length == "0" {
                unsized_signals += 1;
                println!("      ⚠️  {} has no known length", signal_name);
            }
            if layout.compu_method == NO_COMPU_METHOD {
                unresolved_compu += 1;
            }
        }
    }

    println!("\n📊 Summary:");
    println!("  PDUs:                        {}", pdus.len());
    println!("  Signals without length:      {}", unsized_signals);
    println!("  Signals without compu method: {}", unresolved_compu);
}
