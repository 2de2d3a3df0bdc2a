use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process,
    time::Instant,
};

use log::info;

use cluvrp_core::{
    AppOptions, ClusterAssignment, ConvertConfig, Instance, InstancePaths, ParBatchConfig,
    RenderConfig, Result, RunMode, Tour, convert_vrp_instance, discover_instances,
    generate_par_files, logging, prompt_selection, render_solution, score_contiguity,
};

const CONVERT_DEFAULT_RUNS: usize = 1;
const PAR_BATCH_DEFAULT_RUNS: usize = 10;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let now = Instant::now();
    let options = AppOptions::from_args()?;
    logging::init_logger(&options)?;

    match options.mode {
        RunMode::Eval => run_eval(&options)?,
        RunMode::Convert => run_convert(&options)?,
        RunMode::GenPars => run_gen_pars(&options)?,
    }

    info!("done: time={:.2}s", now.elapsed().as_secs_f32());
    Ok(())
}

fn run_eval(options: &AppOptions) -> Result<()> {
    let instances_dir = options.instances_root();
    let paths = match &options.instance {
        Some(name) => InstancePaths::for_name(&instances_dir, name),
        None => match select_instance_interactively(&instances_dir)? {
            Some(paths) => paths,
            None => return Ok(()),
        },
    };

    let instance = Instance::from_file(&paths.problem)?;
    let tour = Tour::from_file(&paths.tour)?;
    let clusters = ClusterAssignment::from_file(&paths.clusters)?;

    let filtered = tour.filtered(&instance);
    info!(
        "eval: instance={} nodes={} clusters={} tour={} valid={}",
        instance.name,
        instance.len(),
        clusters.unique_clusters().len(),
        tour.len(),
        filtered.len()
    );
    info!("eval: distance={:.1}", tour.cyclic_distance(&instance));

    let report = score_contiguity(&filtered, &clusters);
    println!("nodes in tour: {}", tour.len());
    println!("valid nodes in tour: {}", filtered.len());
    println!("broken clusters: {}", report.broken_count());
    println!("penalty: {}", report.penalty);

    let output = options
        .output_path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", instance.name)));
    render_solution(
        &output,
        &instance,
        &filtered,
        &clusters,
        &report,
        &RenderConfig::default(),
    )?;
    println!("rendered: {}", output.display());
    Ok(())
}

/// Lists discovered instances and reads one selection from stdin. An invalid
/// selection is reported to the user and treated as "nothing to do", not as
/// a process failure.
fn select_instance_interactively(instances_dir: &Path) -> Result<Option<InstancePaths>> {
    let instances = discover_instances(instances_dir)?;
    if instances.is_empty() {
        println!(
            "No solved instances found under {}",
            instances_dir.display()
        );
        return Ok(None);
    }

    println!("Available instances:");
    for (idx, instance) in instances.iter().enumerate() {
        println!("  {}. {}", idx + 1, instance.name);
    }
    print!("Select an instance (1-{}) or q to quit: ", instances.len());
    io::stdout().flush().map_err(cluvrp_core::Error::Io)?;

    match prompt_selection(&mut io::stdin().lock(), instances.len()) {
        Ok(Some(idx)) => Ok(Some(instances[idx].clone())),
        Ok(None) => Ok(None),
        Err(err) => {
            println!("{err}");
            Ok(None)
        }
    }
}

fn run_convert(options: &AppOptions) -> Result<()> {
    let Some(input) = &options.instance else {
        return Err(cluvrp_core::Error::invalid_input(format!(
            "convert mode needs a .vrp input path\n\n{}",
            AppOptions::usage()
        )));
    };

    let config = ConvertConfig {
        output_dir: options.output_dir_path().map(Path::to_path_buf),
        n_clusters: options.clusters,
        runs: options.runs.unwrap_or(CONVERT_DEFAULT_RUNS),
        trace_level: options.trace_level,
        ..ConvertConfig::new(input)
    };
    let paths = convert_vrp_instance(&config)?;

    println!("generated: {}", paths.problem.display());
    println!("generated: {}", paths.clusters.display());
    println!("generated: {}", paths.parameters.display());
    Ok(())
}

fn run_gen_pars(options: &AppOptions) -> Result<()> {
    let config = ParBatchConfig {
        runs: options.runs.unwrap_or(PAR_BATCH_DEFAULT_RUNS),
        base_seed: options.seed,
        ..ParBatchConfig::new(options.instances_root(), &options.par_dir)
    };
    let written = generate_par_files(&config)?;

    println!(
        "generated {} .par file(s) under {}",
        written.len(),
        options.par_dir.display()
    );
    Ok(())
}
