use climate_plots::Config;

fn main() -> miette::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let written = climate_plots::run(&config)?;

    println!("\nPlots created successfully!");
    println!("Files saved:");
    for path in written {
        let name = path.file_name().unwrap_or(path.as_os_str());
        println!("- {}", name.to_string_lossy());
    }

    Ok(())
}
