use anyhow::Context;
use clap::*;
use pkr::libs::feature::{Annotation, OverlapMode, Window};
use pkr::libs::summary::SummaryRow;
use std::io::BufRead;
use std::str::FromStr;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("window")
        .about("Reports annotated features in flanking windows of chains")
        .after_help(
            r###"
This command widens every chain from `pkr merge` by a flank on both sides and
reports the features of a GFF-like annotation that fall into the window.

Window:
* left  = min(start of the first member of A, start of the first member of B) - flank
* right = max(end of the last member of A, end of the last member of B) + flank
* Members must carry coordinates, e.g. `peak_1(100,200), peak_2(180,260)`

Overlap modes:
* 0 - feature start (TSS) in [left, right]
* 1 - feature end (TTS) in [left, right]
* 2 - feature span overlaps the window by more than 0 bp

Output, one line per matched feature:

    chr  flank  total_len_A  total_len_B  members_A  members_B  feature

Notes:
* Summary lines need at least 5 columns: chr first, then the totals and the
  members as the last four columns. Extra columns after chr are ignored.
* Annotation columns used: 1 chr, 4 start, 5 end, 9 attributes.
  `chr1`..`chr16` are renamed to `chrI`..`chrXVI`.
  Lines starting with `#` are skipped; reading stops at `##FASTA`.
* Annotation features MUST be sorted by start within each chromosome;
  scanning stops at the first feature starting past the window.
* Flank size and overlap mode are echoed to stderr.

Examples:
1. Features overlapping 500 bp flanking windows:
   pkr window 500 2 chains.tsv saccharomyces_cerevisiae.gff

2. TSSs within 1 kb of chains:
   pkr window 1000 0 chains.tsv genes.sorted.gff -o tss.tsv

"###,
        )
        .arg(
            Arg::new("flank")
                .required(true)
                .index(1)
                .value_parser(value_parser!(i64).range(0..))
                .help("Flank size added to both sides of a chain"),
        )
        .arg(
            Arg::new("mode")
                .required(true)
                .index(2)
                .value_parser(value_parser!(u8).range(0..=2))
                .help("Overlap mode: 0 start, 1 end, 2 span"),
        )
        .arg(
            Arg::new("summary")
                .required(true)
                .index(3)
                .help("Chain summaries. [stdin] for standard input"),
        )
        .arg(
            Arg::new("annotation")
                .required(true)
                .index(4)
                .help("Sorted GFF-like annotation"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Print feature and chain counts to stderr"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let flank = *args.get_one::<i64>("flank").unwrap();
    let mode = OverlapMode::from_code(*args.get_one::<u8>("mode").unwrap())?;
    let summary = args.get_one::<String>("summary").unwrap();
    let gff = args.get_one::<String>("annotation").unwrap();
    let is_verbose = args.get_flag("verbose");

    eprintln!("flank size: {}", flank);
    eprintln!("overlap mode: {}", mode);

    //----------------------------
    // Load
    //----------------------------
    let annotation =
        Annotation::from_reader(pkr::reader(gff)?).with_context(|| gff.to_string())?;
    if annotation.is_empty() {
        eprintln!("Warning: no features in {}", gff);
    }

    let mut rows: Vec<(SummaryRow, Window)> = vec![];
    for (i, line) in pkr::reader(summary)?.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = SummaryRow::from_str(&line)
            .with_context(|| format!("{}: line {}", summary, i + 1))?;
        let window = row
            .window(flank)
            .with_context(|| format!("{}: line {}", summary, i + 1))?;
        rows.push((row, window));
    }

    //----------------------------
    // Match
    //----------------------------
    if is_verbose {
        eprintln!("features: {}", annotation.len());
        eprintln!("chains: {}", rows.len());
    }

    let mut out_lines: Vec<String> = vec![];
    for (row, window) in &rows {
        for feature in annotation.lookup(&row.chr, window, mode) {
            out_lines.push(row.format(flank, &feature.name));
        }
    }

    //----------------------------
    // Output
    //----------------------------
    let mut writer = pkr::writer(args.get_one::<String>("outfile").unwrap())?;
    for line in &out_lines {
        writer.write_fmt(format_args!("{}\n", line))?;
    }
    writer.flush()?;

    Ok(())
}
