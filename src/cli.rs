use clap::Parser;

#[derive(Parser)]
#[command(name = "sub-dl")]
#[command(about = "Download Subscene subtitles for the releases in your media directory")]
pub struct Cli {
    /// Configure your media directory and subtitle language
    #[arg(short = 'c', long = "config")]
    pub config: bool,

    /// Automatically choose the first ranked subtitle
    #[arg(short = 'a', long = "auto")]
    pub auto: bool,

    /// Launch the media player after downloading subtitles for a single file
    #[arg(short = 'w', long = "watch")]
    pub watch: bool,

    /// List the best rated subtitles first instead of the ascending listing order
    #[arg(long = "best-first")]
    pub best_first: bool,
}
