use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// More rows than the default row limit so truncation shows up.
const GAMES: usize = 8000;

const HEADER: [&str; 10] = [
    "Name",
    "Platform",
    "Year",
    "Genre",
    "Publisher",
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

const PLATFORMS: [&str; 10] = ["2600", "NES", "SNES", "N64", "GB", "PS", "PS2", "Wii", "X360", "PS4"];
const GENRES: [&str; 8] = [
    "Action", "Sports", "Platform", "Racing", "Role-Playing", "Puzzle", "Shooter", "Misc",
];
const PUBLISHERS: [&str; 6] = [
    "Nintendo",
    "Electronic Arts",
    "Activision",
    "Sony Computer Entertainment",
    "Ubisoft",
    "Sega",
];
const WORDS: [&str; 12] = [
    "Super", "Legend", "Mario", "Dragon", "Star", "Racer", "Quest", "Kart", "Fighter", "Party",
    "Galaxy", "Tactics",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Heavy-tailed sales figure in millions, most games sell little.
    fn sales(&mut self, scale: f64) -> f64 {
        let u = self.next_f64().max(1e-12);
        ((-u.ln()).powi(3) * scale * 100.0).round() / 100.0
    }
}

/// One generated game, every cell as it will appear in the CSV.
struct Game {
    cells: [String; 10],
}

fn generate_game(i: usize, rng: &mut SimpleRng) -> Game {
    let name = format!("{} {} {}", rng.pick(&WORDS), rng.pick(&WORDS), i % 7 + 1);
    let platform = rng.pick(&PLATFORMS).to_string();
    let year = if rng.chance(0.02) {
        "N/A".to_string()
    } else {
        (1980 + rng.next_u64() % 37).to_string()
    };
    let genre = rng.pick(&GENRES).to_string();
    let publisher = if rng.chance(0.01) {
        String::new()
    } else {
        rng.pick(&PUBLISHERS).to_string()
    };

    let regional = [
        rng.sales(0.3),
        rng.sales(0.2),
        rng.sales(0.1),
        rng.sales(0.05),
    ];
    let global = (regional.iter().sum::<f64>() * 100.0).round() / 100.0;

    let [na, eu, jp, other] = regional.map(|v| format!("{v:.2}"));
    let global = format!("{global:.2}");

    // A few dirty cells for the cleaning pipeline to repair.
    let na = if rng.chance(0.005) { format!("-{na}") } else { na };
    let eu = if rng.chance(0.005) { "unknown".to_string() } else { eu };

    Game {
        cells: [name, platform, year, genre, publisher, na, eu, jp, other, global],
    }
}

fn write_csv(path: &str, games: &[Game]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADER)?;
    for game in games {
        writer.write_record(&game.cells)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parquet copy: text columns stay text, numeric columns are nullable
/// floats (dirty cells become nulls), like a pandas `to_parquet()` export.
fn write_parquet(path: &str, games: &[Game]) -> Result<()> {
    let numeric = |col: usize| -> ArrayRef {
        Arc::new(Float64Array::from(
            games
                .iter()
                .map(|g| g.cells[col].parse::<f64>().ok())
                .collect::<Vec<_>>(),
        ))
    };
    let text = |col: usize| -> ArrayRef {
        Arc::new(StringArray::from(
            games
                .iter()
                .map(|g| Some(g.cells[col].as_str()).filter(|s| !s.is_empty()))
                .collect::<Vec<_>>(),
        ))
    };

    let mut fields = Vec::with_capacity(HEADER.len());
    let mut arrays = Vec::with_capacity(HEADER.len());
    for (col, name) in HEADER.iter().enumerate() {
        let is_text = matches!(*name, "Name" | "Platform" | "Genre" | "Publisher");
        let data_type = if is_text { DataType::Utf8 } else { DataType::Float64 };
        fields.push(Field::new(*name, data_type, true));
        arrays.push(if is_text { text(col) } else { numeric(col) });
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let games: Vec<Game> = (0..GAMES).map(|i| generate_game(i, &mut rng)).collect();

    let csv_path = "vgsales_sample.csv";
    write_csv(csv_path, &games)?;
    let parquet_path = "vgsales_sample.parquet";
    write_parquet(parquet_path, &games)?;

    log::info!("Wrote {} games to {csv_path} and {parquet_path}", games.len());
    println!("Wrote {} games to {csv_path} and {parquet_path}", games.len());
    Ok(())
}
