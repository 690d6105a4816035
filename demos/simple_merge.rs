use bytepair::{TrainerConfig, Tokenizer, decode, train_with_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let text = "aaabdaaabac";
    let config = TrainerConfig::new(259);

    let out = train_with_config(text, &config)?;

    println!("{}", out.summary());
    println!("\nMerge rules (in learned order):");
    for record in out.rules.records() {
        println!("{record}");
    }

    println!("\nFinal ids: {:?}", out.ids);
    println!("Decoded: {}", decode(&out.ids, &out.rules)?);

    let tokenizer = Tokenizer::from(out);
    println!("\nEncode \"aaab aaac\": {:?}", tokenizer.encode("aaab aaac"));

    Ok(())
}
