use anyhow::Context;
use clap::*;
use pkr::libs::chain::{link, ChainSummary, Delimiter};
use pkr::libs::region::{ColumnLayout, NameFormat, OverlapRecord};
use std::io::BufRead;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("merge")
        .about("Chains overlapping peak pairs from overlap-join output")
        .after_help(
            r###"
This command reads paired regions produced by an overlap-join tool and merges
adjacent pairs into chains. One summary line is written per chain:

    chr  total_len_A  total_len_B  members_A  members_B

Chaining:
* Each region name ends with `_<number>`, the ordering key of its peak set.
* A new chain starts when the keys of both sides strictly increase over the
  previous line; otherwise the line joins the current chain.
* Regions of a chain are deduplicated by (chr, start, end, name), ordered by
  position, and their lengths (end - start) are summed.

Notes:
* The input MUST be sorted by chromosome, then by start of side A:
    sort -k2,2 -k3,3n fjoin.tsv > fjoin.sorted.tsv
* Chains follow line adjacency only; use --break-on-chr to also split
  chains when the chromosome changes.
* --layout is offset,width,chr,start,end,name; side A starts at column
  `offset` (0-based), side B `width` columns later, and chr/start/end/name
  are relative to a side. The default matches fjoin output: 1,9,0,1,2,8
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'

Examples:
1. Summarize chains with annotated members:
   pkr merge fjoin.sorted.tsv

2. Bare names, one member per column:
   pkr merge fjoin.sorted.tsv --names bare --sep tab

3. Pairs of 4-column records without a leading column:
   pkr merge pairs.tsv --layout 0,4,0,1,2,3

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Sorted overlap-join output. [stdin] for standard input"),
        )
        .arg(
            Arg::new("names")
                .long("names")
                .num_args(1)
                .value_parser(["coords", "bare"])
                .default_value("coords")
                .help("Member format: name(start,end) or bare name"),
        )
        .arg(
            Arg::new("sep")
                .long("sep")
                .num_args(1)
                .value_parser(["comma", "tab"])
                .default_value("comma")
                .help("Separator between members of one side"),
        )
        .arg(
            Arg::new("layout")
                .long("layout")
                .num_args(1)
                .value_parser(value_parser!(ColumnLayout))
                .default_value("1,9,0,1,2,8")
                .help("Columns: offset,width,chr,start,end,name"),
        )
        .arg(
            Arg::new("break_on_chr")
                .long("break-on-chr")
                .action(ArgAction::SetTrue)
                .help("Also start a new chain when the chromosome changes"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Print record and chain counts to stderr"),
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
    let infile = args.get_one::<String>("infile").unwrap();
    let names: NameFormat = args.get_one::<String>("names").unwrap().parse()?;
    let sep: Delimiter = args.get_one::<String>("sep").unwrap().parse()?;
    let layout = *args.get_one::<ColumnLayout>("layout").unwrap();
    let break_on_chr = args.get_flag("break_on_chr");
    let is_verbose = args.get_flag("verbose");

    //----------------------------
    // Load
    //----------------------------
    let reader = pkr::reader(infile)?;
    let mut records: Vec<OverlapRecord> = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = OverlapRecord::parse(&line, &layout)
            .with_context(|| format!("{}: line {}", infile, i + 1))?;
        records.push(record);
    }
    let n_records = records.len();

    //----------------------------
    // Chain
    //----------------------------
    let chains = link(records, break_on_chr)?;
    if is_verbose {
        eprintln!("records: {}", n_records);
        eprintln!("chains: {}", chains.len());
    }

    //----------------------------
    // Output
    //----------------------------
    let mut writer = pkr::writer(args.get_one::<String>("outfile").unwrap())?;
    for (i, chain) in chains.iter().enumerate() {
        let summary = ChainSummary::from_chain(chain)
            .with_context(|| format!("{}: chain {}", infile, i + 1))?;
        writer.write_fmt(format_args!("{}\n", summary.format(names, sep)))?;
    }
    writer.flush()?;

    Ok(())
}
