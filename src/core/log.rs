use crate::db::queries::load_log;
use crate::errors::AppResult;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;
use rusqlite::Connection;

const OP_WIDTH_LIMIT: usize = 60;

/// ANSI color per audited operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "punch_in" | "manager_punch_in" => Colour::Green,
        "punch_out" | "manager_punch_out" => Colour::Red,
        "task" | "planning" => Colour::Cyan,
        "rollback" => Colour::Yellow,
        "finalize" => Colour::Purple,
        "migration_applied" => Colour::Purple,
        "init" | "add_market" | "add_employee" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(conn: &Connection) -> AppResult<String> {
        let entries = load_log(conn)?;
        if entries.is_empty() {
            return Ok("📜 Internal log is empty.\n".to_string());
        }

        let op_w = entries
            .iter()
            .map(|(_, _, op, target, _)| op_target(op, target).len())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_LIMIT);
        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, ..)| date.len())
            .max()
            .unwrap_or(10);

        let mut out = String::from("📜 Internal log:\n\n");

        for (id, date, operation, target, message) in &entries {
            let color = color_for_operation(operation);

            let mut visible = op_target(operation, target);
            if visible.chars().count() > OP_WIDTH_LIMIT {
                visible = visible.chars().take(OP_WIDTH_LIMIT - 3).collect::<String>() + "...";
            }

            // only the operation word is colored
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

            out.push_str(&format!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}\n",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            ));
        }

        Ok(out)
    }
}

fn op_target(operation: &str, target: &str) -> String {
    if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    }
}
