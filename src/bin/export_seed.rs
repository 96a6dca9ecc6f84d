use mergington_activities::database::seed;

// Prints the built-in activities in the ACTIVITIES_SEED_FILE layout.
fn main() {
    match seed::render_seed(&seed::default_activities()) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("seed export failed: {}", e);
            std::process::exit(1);
        }
    }
}
