//! Show the topology of a preset network.

use anyhow::Result;
use colored::Colorize;
use tracenet::prelude::*;

use crate::datasets::Preset;

pub fn run(preset: Preset, json: bool) -> Result<()> {
    let model = preset.build(IdentityTable::new())?;
    let stats = model.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_stats(&format!("{:?} network", preset), &stats);
    Ok(())
}

pub fn print_stats(title: &str, stats: &NetworkStats) {
    println!("{}", title.white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Layers".blue().bold());
    println!("  Input:             {}", stats.input_size.to_string().cyan());
    if stats.hidden_sizes.is_empty() {
        println!("  Hidden:            {}", "none".dimmed());
    } else {
        let hidden: Vec<String> = stats.hidden_sizes.iter().map(usize::to_string).collect();
        println!("  Hidden:            {}", hidden.join(" · ").cyan());
    }
    println!("  Output:            {}", stats.output_size.to_string().cyan());
    println!();

    println!("{}", "Graph".blue().bold());
    println!("  Neurons:           {}", stats.neurons.to_string().cyan());
    println!("  Connections:       {}", stats.connections.to_string().cyan());
    println!("  Gated:             {}", stats.gated_connections.to_string().green());
    println!("  Self-recurrent:    {}", stats.recurrent_connections.to_string().green());
    println!();
    println!("{}", "═".repeat(40).dimmed());
}
