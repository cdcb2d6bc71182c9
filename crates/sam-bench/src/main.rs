use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use serde::Serialize;

use sam_analyzer::Analyzer;
use sam_compiler::Compiler;
use sam_lexer::Lexer;
use sam_parser::Parser as SamParser;
use sam_syntax::error::Error;
use sam_vm::{Vm, DEFAULT_MEMORY};

#[derive(Parser, Debug)]
#[command(name = "sam-bench", about = "Time every stage of the sam pipeline")]
struct Cli {
    /// Specific script(s) to run (by name, e.g. primes). If omitted, runs all discovered scripts.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Iterations per script (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Output JSON file path; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Directory to discover .sam scripts in; default: <workspace>/demos
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// VM memory slots
    #[arg(long = "memory", default_value_t = DEFAULT_MEMORY)]
    memory: usize,

    /// List discovered scripts and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    instructions: usize,
    slots: usize,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_lex_ms: f64,
    avg_parse_ms: f64,
    avg_analyze_ms: f64,
    avg_compile_ms: f64,
    avg_exec_ms: f64,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    sam_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

/// Per-iteration stage timings in milliseconds.
#[derive(Debug, Default)]
struct Timings {
    total: Vec<f64>,
    lex: Vec<f64>,
    parse: Vec<f64>,
    analyze: Vec<f64>,
    compile: Vec<f64>,
    exec: Vec<f64>,
    instructions: usize,
    slots: usize,
}

fn workspace_root() -> PathBuf {
    // crates/sam-bench -> crates -> root
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest.ancestors().nth(2).map(Path::to_path_buf).unwrap_or(manifest)
}

fn discover_scripts(dir: &Path) -> io::Result<Vec<ScriptCase>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let p = entry.path();
        if p.extension().and_then(|s| s.to_str()) == Some("sam") {
            let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
            out.push(ScriptCase { name, path: p });
        }
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

/// Run every stage once with program output discarded, timing each stage.
fn run_once(src: &str, memory: usize, timings: &mut Timings) -> Result<(), Error> {
    let t0 = Instant::now();

    let mut t = Instant::now();
    let tokens = Lexer::new(src).tokenize()?;
    let t_lex = t.elapsed();

    t = Instant::now();
    let program = SamParser::new(tokens).parse_program()?;
    let t_parse = t.elapsed();

    t = Instant::now();
    Analyzer::new().analyze(&program)?;
    let t_analyze = t.elapsed();

    t = Instant::now();
    let bytecode = Compiler::new().compile(&program)?;
    let t_compile = t.elapsed();

    t = Instant::now();
    let mut vm = Vm::with_output(io::sink()).with_memory(memory);
    vm.run(&bytecode)?;
    let t_exec = t.elapsed();

    timings.total.push(dur_ms(t0.elapsed()));
    timings.lex.push(dur_ms(t_lex));
    timings.parse.push(dur_ms(t_parse));
    timings.analyze.push(dur_ms(t_analyze));
    timings.compile.push(dur_ms(t_compile));
    timings.exec.push(dur_ms(t_exec));
    timings.instructions = bytecode.code.len();
    timings.slots = bytecode.slots;
    Ok(())
}

fn measure_script(
    src: &str,
    iterations: u32,
    warmup: u32,
    memory: usize,
) -> Result<Timings, Error> {
    let mut scratch = Timings::default();
    for _ in 0..warmup {
        run_once(src, memory, &mut scratch)?;
    }
    let mut timings = Timings::default();
    for _ in 0..iterations {
        run_once(src, memory, &mut timings)?;
    }
    Ok(timings)
}

fn dur_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = if vals.is_empty() { 0.0 } else { vals.iter().sum::<f64>() / (vals.len() as f64) };
    (avg, min, max)
}

fn write_results(path: &Path, doc: &OutputDoc) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let root = workspace_root();

    let dir = cli.dir.clone().unwrap_or_else(|| root.join("demos"));
    let mut scripts = match discover_scripts(&dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", dir.display(), e);
            return ExitCode::from(2);
        }
    };

    if cli.list {
        println!("Discovered scripts:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return ExitCode::SUCCESS;
    }

    if !cli.tests.is_empty() {
        let wanted: std::collections::HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            eprintln!("No matching scripts. Use --list to see available.");
            return ExitCode::from(2);
        }
    }

    if scripts.is_empty() {
        eprintln!("No .sam scripts found in {}.", dir.display());
        return ExitCode::from(2);
    }

    let mut results = Vec::new();

    for case in &scripts {
        let src = match fs::read_to_string(&case.path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to read {}: {}", case.path.display(), e);
                return ExitCode::FAILURE;
            }
        };
        let timings = match measure_script(&src, cli.iterations, cli.warmup, cli.memory) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("{}: {}: {}", case.name, e.kind, e);
                return ExitCode::FAILURE;
            }
        };
        let (avg_t, min_t, max_t) = stats(&timings.total);
        let (avg_l, _, _) = stats(&timings.lex);
        let (avg_p, _, _) = stats(&timings.parse);
        let (avg_a, _, _) = stats(&timings.analyze);
        let (avg_c, _, _) = stats(&timings.compile);
        let (avg_e, _, _) = stats(&timings.exec);

        println!(
            "{:>12}: total avg={:.3}ms min={:.3}ms max={:.3}ms | lex={:.3}ms parse={:.3}ms check={:.3}ms compile={:.3}ms exec={:.3}ms | {} instrs",
            case.name, avg_t, min_t, max_t, avg_l, avg_p, avg_a, avg_c, avg_e, timings.instructions
        );

        results.push(BenchResult {
            name: case.name.clone(),
            iterations: cli.iterations,
            instructions: timings.instructions,
            slots: timings.slots,
            avg_total_ms: avg_t,
            min_total_ms: min_t,
            max_total_ms: max_t,
            avg_lex_ms: avg_l,
            avg_parse_ms: avg_p,
            avg_analyze_ms: avg_a,
            avg_compile_ms: avg_c,
            avg_exec_ms: avg_e,
        });
    }

    let out_path = match cli.output.clone() {
        Some(p) => p,
        None => {
            // Windows-safe filename timestamp
            let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
            root.join("benchmark/results").join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        sam_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };

    if let Err(e) = write_results(&out_path, &doc) {
        eprintln!("Failed to write {}: {}", out_path.display(), e);
        return ExitCode::FAILURE;
    }

    println!("\nSaved results to {}", out_path.display());
    ExitCode::SUCCESS
}
