use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_hemostasis::cli::{
    BatchArgs, Cli, Commands, FactorsCommand, FactorsShowArgs, RunArgs, SimulateArgs,
    ValidateArgs,
};
use kira_hemostasis::ctx::{Ctx, Overlays};
use kira_hemostasis::io;
use kira_hemostasis::io::panel::{label_from_path, load_panel, order_timecourse_inputs};
use kira_hemostasis::labs::LabStatus;
use kira_hemostasis::network::{ActivityMap, apply_preset, propagate};
use kira_hemostasis::pipeline::Pipeline;
use kira_hemostasis::pipeline::stage7_timecourse::Stage7Timecourse;
use kira_hemostasis::scores::TimepointSummary;
use kira_hemostasis::simulate::{SimulationConfig, ThrombinSimulator};
use kira_hemostasis::tables;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(args)?,
        Commands::Batch(args) => handle_batch(args)?,
        Commands::Factors(args) => match args.command {
            FactorsCommand::Show(show) => handle_factors_show(show)?,
        },
        Commands::Validate(args) => handle_validate(args)?,
        Commands::Simulate(args) => handle_simulate(args)?,
    }
    Ok(())
}

fn new_ctx(input: PathBuf, out: PathBuf, args: &RunArgs) -> Ctx {
    let mut ctx = Ctx::new(
        input,
        out,
        args.timecourse,
        args.json,
        args.tsv,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.overlays = Overlays {
        ranges: args.ranges.clone(),
        scenarios: args.scenarios.clone(),
    };
    ctx.scenario_override = args.scenario.clone();
    ctx
}

fn handle_run(args: RunArgs) -> Result<()> {
    if args.timecourse && args.input.len() < 2 {
        bail!("--timecourse requires at least 2 --input values");
    }
    if !args.timecourse && args.input.len() != 1 {
        bail!("multiple --input requires --timecourse");
    }

    if !args.timecourse {
        let input = args.input[0].clone();
        let mut ctx = new_ctx(input, args.out.clone(), &args);
        Pipeline::single_panel().run(&mut ctx)?;
        print_summary(&ctx)?;
        return Ok(());
    }

    let ordered_inputs = order_timecourse_inputs(&args.input);
    let mut master_ctx = new_ctx(ordered_inputs[0].clone(), args.out.clone(), &args);
    for input in ordered_inputs {
        let label = label_from_path(&input);
        let out_dir = master_ctx.output.out_dir.join(&label);
        let mut ctx = new_ctx(input, out_dir, &args);
        Pipeline::single_panel().run(&mut ctx)?;
        print_summary(&ctx)?;

        let cal = ctx.config()?.calibration;
        let tp = TimepointSummary::from_labs(&label, &ctx.panel()?.labs, &cal);
        master_ctx.timecourse_points.push(tp);
    }

    let pipeline = Pipeline::new(vec![Box::new(Stage7Timecourse::new())]);
    pipeline.run(&mut master_ctx)?;
    print_timecourse_summary(&master_ctx);

    if args.json {
        std::fs::create_dir_all(&master_ctx.output.out_dir)?;
        if let Some(tc) = &master_ctx.timecourse_result {
            io::json_writer::write_json(&master_ctx.output.out_dir.join("timecourse.json"), tc)?;
        }
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<()> {
    if args.input.is_empty() {
        bail!("batch requires at least one --input");
    }
    let config = tables::load_builtin()?
        .with_overlays(args.ranges.as_deref(), args.scenarios.as_deref())?;
    let mut panels = Vec::with_capacity(args.input.len());
    for path in &args.input {
        panels.push(load_panel(path, &config.calibration)?);
    }
    let rows = io::batch::evaluate_batch(&config, &panels, args.threads)?;
    io::batch::write_batch_tsv(&args.out, &rows)?;
    tracing::info!(panels = rows.len(), out = %args.out.display(), "batch_written");
    println!("kira-hemostasis batch: {} panels -> {}", rows.len(), args.out.display());
    Ok(())
}

fn handle_factors_show(args: FactorsShowArgs) -> Result<()> {
    let config = tables::load_builtin()?.with_overlays(None, args.scenarios.as_deref())?;
    let baseline = ActivityMap::baseline(&config.factors);

    let activity = match args.scenario.as_deref() {
        Some(key) => match config.scenarios.get(key) {
            Some(preset) => {
                println!("scenario: {} ({})", preset.id, preset.label);
                propagate(&config.factors, &apply_preset(&config.factors, &baseline, preset))
            }
            None => {
                tracing::warn!(scenario = %key, "unknown scenario; showing baseline");
                println!("unknown scenario '{}'; showing baseline", key);
                baseline
            }
        },
        None => baseline,
    };

    println!("factors (version {}):", config.version);
    let states = config.factors.snapshot(&activity);
    let mut out = std::io::stdout().lock();
    io::tsv_writer::write_factor_rows(&mut out, &states)?;
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.input,
        PathBuf::from("."),
        false,
        false,
        false,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.overlays.ranges = args.ranges;
    Pipeline::validate_only().run(&mut ctx)?;
    print_validate_summary(&ctx)
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = tables::load_builtin()?.with_overlays(None, args.scenarios.as_deref())?;
    let preset = config.scenarios.get(&args.scenario);
    if preset.is_none() {
        bail!(
            "unknown scenario '{}' (known: {})",
            args.scenario,
            config.scenario_keys().join(", ")
        );
    }

    let sim = ThrombinSimulator::new(SimulationConfig {
        t_end_s: args.t_end,
        dt_s: args.dt,
        t_points: args.t_points,
        tf_nm: args.tf,
    });
    let result = sim.run(preset)?;
    let m = result.metrics();

    println!("kira-hemostasis simulate: {}", result.scenario);
    println!("peak IIa: {:.1} nM", m.peak_iia_nm);
    println!("time to peak: {:.1} s", m.time_to_peak_s);
    match m.lag_time_s {
        Some(lag) => println!("lag time: {:.1} s", lag),
        None => println!("lag time: none"),
    }
    println!("peak Xa: {:.1} nM", m.peak_xa_nm);
    println!("final fibrin: {:.1} nM", m.final_fibrin_nm);
    println!("ETP: {:.0} nM*s", m.etp_nm_s);

    if let Some(path) = &args.out {
        io::json_writer::write_json(path, &result.export(args.time_step))?;
        tracing::info!(out = %path.display(), "simulation_exported");
    }
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) -> Result<()> {
    let panel = ctx.panel()?;
    println!("kira-hemostasis validate ok");
    println!("panel: {}", panel.label);
    for entry in &ctx.lab_statuses {
        let status = match entry.status {
            LabStatus::Normal => "normal",
            LabStatus::Low => "low",
            LabStatus::High => "high",
            LabStatus::Critical => "critical",
        };
        println!(
            "{}\t{}\t{}\t{}",
            entry.test.key(),
            entry.value,
            entry.unit,
            status
        );
    }
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn print_timecourse_summary(ctx: &Ctx) {
    if let Some(tc) = &ctx.timecourse_result {
        println!("timecourse trajectory: {}", tc.trajectory);
        for d in &tc.deltas {
            println!(
                "{} -> {}: dINR={:+.2} dAPTT={:+.1} dPLT={:+.0} dFBG={:+.0} dISTH={:+}",
                d.from,
                d.to,
                d.delta_inr,
                d.delta_aptt,
                d.delta_platelets,
                d.delta_fibrinogen,
                d.delta_isth
            );
        }
    }
}
