//! Steps command implementation
//!
//! Prints a flow's transition table. Needs no configuration.

use crate::core::flow::{abha_table, hpr_table, FlowTable};
use crate::domain::{FlowKind, FlowStep};
use clap::Args;

/// Arguments for the steps command
#[derive(Args, Debug)]
pub struct StepsArgs {
    /// Registration flow (abha or hpr)
    #[arg(short, long)]
    pub flow: FlowKind,
}

impl StepsArgs {
    /// Execute the steps command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let rows = match self.flow {
            FlowKind::Abha => table_rows(&abha_table()),
            FlowKind::Hpr => table_rows(&hpr_table()),
        };

        println!("{} registration flow", self.flow.as_str().to_uppercase());
        println!();
        println!(
            "{:<4} {:<30} {:<6} {:<30} {:<26} NEXT",
            "CODE", "STEP", "METHOD", "ENDPOINT", "PAYLOAD"
        );
        for row in rows {
            println!(
                "{:<4} {:<30} {:<6} {:<30} {:<26} {}",
                row[0], row[1], row[2], row[3], row[4], row[5]
            );
        }
        println!();

        Ok(0)
    }
}

/// One `[code, name, method, endpoint, shape, next]` row per step, in flow order
pub fn table_rows<S: FlowStep>(table: &FlowTable<S>) -> Vec<[String; 6]> {
    S::all()
        .iter()
        .filter_map(|step| {
            table.get(step).map(|spec| {
                [
                    step.code(),
                    step.name().to_string(),
                    spec.method.to_string(),
                    spec.endpoint.to_string(),
                    spec.request.shape.to_string(),
                    spec.transition.describe(),
                ]
            })
        })
        .collect()
}
