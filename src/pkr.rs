extern crate clap;
use clap::*;

mod cmd_pkr;

fn main() -> anyhow::Result<()> {
    let app = Command::new("pkr")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`pkr` - Peak-pair chaining and flanking feature matching")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_pkr::merge::make_subcommand())
        .subcommand(cmd_pkr::window::make_subcommand())
        .after_help(
            r###"Subcommands:

* merge  - Chain overlapping peak pairs from overlap-join output
* window - Features in flanking windows around chains

Pipeline:
    sort -k2,2 -k3,3n fjoin.tsv > fjoin.sorted.tsv
    pkr merge fjoin.sorted.tsv > chains.tsv
    pkr window 500 2 chains.tsv genes.gff > features.tsv

"###,
        );

    // Usage errors exit with 1, help and version with 0
    let matches = match app.try_get_matches() {
        Ok(matches) => matches,
        Err(e) if e.use_stderr() => {
            e.print()?;
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    // Check which subcommand the user ran...
    match matches.subcommand() {
        Some(("merge", sub_matches)) => cmd_pkr::merge::execute(sub_matches),
        Some(("window", sub_matches)) => cmd_pkr::window::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
