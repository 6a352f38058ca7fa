use colored::Colorize;

fn main() {
    if let Err(err) = bowtie_cli::run() {
        eprintln!("{} {}", "✗".red(), err);
        std::process::exit(1);
    }
}
