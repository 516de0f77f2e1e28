use std::fs;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use env_logger::Builder;

use dpsim_dag::config::{read_config, Config};
use dpsim_dag::cost;
use dpsim_dag::dag::DAG;
use dpsim_dag::dag_simulation::DagSimulation;
use dpsim_dag::network::read_network_config;
use dpsim_dag::scheduler_resolver::{default_scheduler_resolver, SchedulerParams};
use dpsim_dag::system::{read_system_config, SystemConfig};
use dpsim_dag::worker::WorkerConfig;

const DEFAULT_SCHEDULERS: &[&str] = &[
    "SimpleQueue",
    "MapReduce",
    "MapReduceFlow[max_shuffle=2,max_reduce=1]",
    "Locality",
];

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Simulates a MapReduce job with different scheduling policies and outputs the completion times.
struct Args {
    /// Path to system file (workers, network and run config)
    #[arg(short, long)]
    system: Option<String>,

    /// Number of identical workers if no system file is given
    #[arg(short, long, default_value_t = 10)]
    workers: usize,

    /// Path to network file, overrides the network from system file
    #[arg(short, long)]
    network: Option<String>,

    /// Path to run config file, overrides the config from system file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of map tasks
    #[arg(long, default_value_t = 16)]
    maps: usize,

    /// Number of shuffle tasks, each reading from all map tasks
    #[arg(long, default_value_t = 4)]
    shuffles: usize,

    /// Number of reduce tasks, each reading from all shuffle tasks
    #[arg(long, default_value_t = 1)]
    reduces: usize,

    /// Input size of each map task
    #[arg(long, default_value_t = 10.)]
    input_size: f64,

    /// Size of each map output, by default the map input is split evenly between shuffle tasks
    #[arg(long)]
    map_output_size: Option<f64>,

    /// Worker failure probability per tick, overrides the config
    #[arg(long)]
    failure_probability: Option<f64>,

    /// Straggler probability, overrides the config
    #[arg(long)]
    straggler_probability: Option<f64>,

    /// Scheduler to run, can be repeated (default: all)
    #[arg(long = "scheduler")]
    schedulers: Vec<String>,

    /// Log task progress at info level
    #[arg(short, long)]
    verbose: bool,

    /// Save trace logs in 'traces' dir
    #[arg(short = 't', long = "traces")]
    save_traces: bool,
}

fn build_dag(args: &Args) -> DAG {
    let mut dag = DAG::new();
    let maps = (0..args.maps)
        .map(|i| dag.add_map_task(&format!("map{}", i), args.input_size))
        .collect::<Vec<_>>();
    let shuffles = (0..args.shuffles)
        .map(|i| dag.add_shuffle_task(&format!("shuffle{}", i)))
        .collect::<Vec<_>>();
    let reduces = (0..args.reduces)
        .map(|i| dag.add_reduce_task(&format!("reduce{}", i)))
        .collect::<Vec<_>>();

    for &map in maps.iter() {
        dag.set_comp_length(map, cost::with_stragglers(cost::linear(0.1, 1.)));
        dag.set_output_size(
            map,
            match args.map_output_size {
                Some(size) => cost::fixed_output(size),
                None => cost::proportional(1. / shuffles.len().max(1) as f64),
            },
        );
        for &shuffle in shuffles.iter() {
            dag.add_edge(map, shuffle);
        }
    }
    for &shuffle in shuffles.iter() {
        dag.set_comp_length(shuffle, cost::linear(0.05, 1.));
        dag.set_output_size(shuffle, cost::proportional(1. / reduces.len().max(1) as f64));
        for &reduce in reduces.iter() {
            dag.add_edge(shuffle, reduce);
        }
    }
    for &reduce in reduces.iter() {
        dag.set_comp_length(reduce, cost::with_stragglers(cost::linear(0.1, 1.)));
        if shuffles.is_empty() {
            for &map in maps.iter() {
                dag.add_edge(map, reduce);
            }
        }
    }
    dag
}

fn main() -> std::io::Result<()> {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let mut system = match &args.system {
        Some(path) => read_system_config(path),
        None => SystemConfig {
            workers: vec![WorkerConfig {
                name: "worker".to_string(),
                compute_power: 1.,
                memory: 0,
                count: args.workers,
            }],
            network: Default::default(),
            config: None,
        },
    };
    if let Some(path) = &args.network {
        system.network = read_network_config(path);
    }
    let mut config = match &args.config {
        Some(path) => read_config(path),
        None => system.config.clone().unwrap_or_default(),
    };
    if let Some(p) = args.failure_probability {
        config.failure_probability = p;
    }
    if let Some(p) = args.straggler_probability {
        config.straggler_probability = p;
    }
    if let Err(e) = config.validate() {
        log::error!("invalid config: {}", e);
        std::process::exit(1);
    }
    system.config = Some(config);

    let dag = build_dag(&args);
    let schedulers = if args.schedulers.is_empty() {
        DEFAULT_SCHEDULERS.iter().map(|s| s.to_string()).collect()
    } else {
        args.schedulers.clone()
    };
    if args.save_traces {
        fs::create_dir_all("traces")?;
    }

    let scheduler_width = schedulers.iter().map(|s| s.len()).max().unwrap_or(0);
    println!("\nDAG: {} tasks", dag.task_count());
    println!("System: {}\n", args.system.as_deref().unwrap_or("default"));
    println!(
        "{:>scheduler_width$}  {:>8}  {:>8}  {:>8}  {:>10}",
        "scheduler", "time", "ticks", "failures", "traffic"
    );
    for name in schedulers.iter() {
        let params = SchedulerParams::from_str(name).expect("Cannot parse scheduler params");
        let scheduler = default_scheduler_resolver(&params).expect("Cannot create scheduler");
        let mut sim = DagSimulation::from_system(dag.clone(), &system, scheduler);
        sim.set_verbose(args.verbose);
        sim.enable_trace_log(args.save_traces);

        let time = sim.run();
        if args.save_traces {
            let trace_path = format!(
                "traces/{}_{}.json",
                args.system
                    .as_deref()
                    .and_then(|s| Path::new(s).file_stem())
                    .and_then(|s| s.to_str())
                    .unwrap_or("default"),
                params
            );
            sim.runner().trace_log().save_to_file(&trace_path)?;
        }
        let stats = sim.runner().stats();
        println!(
            "{:>scheduler_width$}  {:>8}  {:>8}  {:>8}  {:>10.1}",
            name, time, stats.ticks, stats.task_failures, stats.network_traffic
        );
        if args.verbose {
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
    }
    Ok(())
}
