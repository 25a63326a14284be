//! # Seed File Generator
//!
//! Writes the demo seed data as JSON, for loading with
//! `SERVICEPRO_SEED_PATH` or editing by hand.
//!
//! ## Usage
//! ```bash
//! # Print to stdout
//! cargo run -p servicepro-store --bin seed
//!
//! # Write to a file, with some walk-in customers
//! cargo run -p servicepro-store --bin seed -- --out ./data/seed.json --customers 20
//! ```

use std::env;
use std::fs;

use servicepro_core::{Customer, Money};
use servicepro_store::SeedData;

const FAMILY_NAMES: &[&str] = &["Nguyễn", "Trần", "Lê", "Phạm", "Hoàng", "Vũ", "Đặng", "Bùi"];
const GIVEN_NAMES: &[&str] = &["An", "Bình", "Chi", "Dũng", "Hà", "Khoa", "Lan", "Minh", "Nam", "Thảo"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut out: Option<String> = None;
    let mut customers: usize = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                i += 1;
                out = args.get(i).cloned();
            }
            "--customers" | "-c" => {
                i += 1;
                customers = args.get(i).map(|s| s.parse()).transpose()?.unwrap_or(0);
            }
            "--help" | "-h" => {
                println!("ServicePro Seed File Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --out <PATH>        Write to file instead of stdout");
                println!("  -c, --customers <N>     Add N generated customers (default: 0)");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut seed = SeedData::demo();
    seed.customers.extend((0..customers).map(generated_customer));

    let json = seed.to_json()?;
    match out {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("Wrote {} customers, {} products to {}", seed.customers.len(), seed.products.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn generated_customer(index: usize) -> Customer {
    let family = FAMILY_NAMES[index % FAMILY_NAMES.len()];
    let given = GIVEN_NAMES[(index / FAMILY_NAMES.len()) % GIVEN_NAMES.len()];
    Customer {
        id: format!("c{}", index + 1),
        name: format!("{} {}", family, given),
        phone: format!("09{:08}", index),
        address: String::new(),
        balance: Money::zero(),
    }
}
