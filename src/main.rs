//! Command-line interface for bo-tokenize.
//!
//! Usage:
//!   bo-tokenize [OPTIONS] <TEXT>
//!   echo "བཀྲ་ཤིས་བདེ་ལེགས།" | bo-tokenize
//!
//! Options:
//!   -d, --dict <FILE>  Path to dictionary TSV file
//!   -s, --simple       Tokenize without a dictionary (syllables only)
//!   -j, --json         Output as JSON
//!   -h, --help         Show help

use bo_tokenize::loader::TrieBuilder;
use bo_tokenize::{Token, Tokenizer, Trie};
use std::io::Read;
use std::{env, fs, process};

const HELP: &str = r#"bo-tokenize - Dictionary-based longest-match tokenizer for Tibetan text

USAGE:
    bo-tokenize [OPTIONS] [TEXT]
    echo "བཀྲ་ཤིས་བདེ་ལེགས།" | bo-tokenize

OPTIONS:
    -d, --dict <FILE>  Path to dictionary TSV file
    -s, --simple       Tokenize without a dictionary (syllables only)
    -j, --json         Output as JSON
    -h, --help         Show this help message

EXAMPLES:
    bo-tokenize "བཀྲ་ཤིས་བདེ་ལེགས།"
    bo-tokenize -s "བཀྲ་ཤིས་བདེ་ལེགས།"
    bo-tokenize -d dictionary.tsv "བཀྲ་ཤིས་བདེ་ལེགས།"
    echo "བཀྲ་ཤིས་བདེ་ལེགས།" | bo-tokenize -s
"#;

/// Parsed command-line arguments.
struct Options {
    dict_path: Option<String>,
    simple: bool,
    json: bool,
    text: Option<String>,
}

fn die(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    process::exit(1);
}

/// Walk `argv[1..]`, collecting flags and the first bare positional as the
/// input text. Exits the process directly on `-h`/`--help` or a bad flag.
fn parse_options(argv: &[String]) -> Options {
    let mut opts = Options {
        dict_path: None,
        simple: false,
        json: false,
        text: None,
    };

    let mut args = argv.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                eprint!("{HELP}");
                process::exit(0);
            }
            "-s" | "--simple" => opts.simple = true,
            "-j" | "--json" => opts.json = true,
            "-d" | "--dict" => {
                let path = args.next().unwrap_or_else(|| die("--dict requires a file path"));
                opts.dict_path = Some(path.clone());
            }
            other if !other.starts_with('-') => opts.text = Some(other.to_string()),
            other => {
                eprint!("{HELP}");
                die(format!("unknown option '{other}'"));
            }
        }
    }
    opts
}

fn read_stdin() -> String {
    let mut buf = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
        die(format!("reading stdin: {e}"));
    }
    buf.trim_end_matches('\n').to_string()
}

fn build_trie(opts: &Options) -> Trie {
    if opts.simple {
        return Trie::new();
    }
    let Some(path) = &opts.dict_path else {
        return Trie::new();
    };
    let content = fs::read_to_string(path).unwrap_or_else(|e| die(format!("reading dictionary '{path}': {e}")));
    let mut builder = TrieBuilder::new();
    builder.load_tsv(&content);
    builder.build()
}

fn print_plain(tokens: &[Token]) {
    for token in tokens {
        let tag = token.pos.as_deref().unwrap_or_else(|| token.chunk_type.as_str());
        println!("{}\t{}\t{}", token.text, tag, token.syllables.join("་"));
    }
}

fn print_json(tokens: &[Token]) {
    let values: Vec<_> = tokens.iter().map(Token::to_json).collect();
    match serde_json::to_string_pretty(&values) {
        Ok(json) => println!("{json}"),
        Err(e) => die(format!("serializing to JSON: {e}")),
    }
}

fn main() {
    let argv: Vec<String> = env::args().skip(1).collect();
    let opts = parse_options(&argv);

    let input_text = opts.text.clone().unwrap_or_else(read_stdin);
    if input_text.is_empty() {
        eprint!("{HELP}");
        die("no input text provided");
    }

    let trie = build_trie(&opts);
    let tokenizer = Tokenizer::new(trie);
    let tokens = tokenizer.tokenize(&input_text, true, false);

    if opts.json {
        print_json(&tokens);
    } else {
        print_plain(&tokens);
    }
}
