//! Terminal host: renders schedules and walks through rounds on stdin.

use std::io::{self, BufRead, Write};

use crate::engine;
use crate::models::{PerformanceTable, Player, Round, Schedule};

fn join(players: &[Player], sep: &str) -> String {
    players
        .iter()
        .map(Player::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

/// One line per round: `#3  A & B  vs  C & D  | resting: E, F`.
pub fn render_round(round: &Round) -> String {
    let mut line = format!(
        "#{:<3} {}  vs  {}  | resting: {}",
        round.index,
        join(&round.team1, " & "),
        join(&round.team2, " & "),
        if round.resting.is_empty() {
            "-".to_string()
        } else {
            join(&round.resting, ", ")
        }
    );
    if let Some(winner) = round.winner {
        line.push_str(&format!("  [won: {}]", winner));
    }
    if let Some(fallback) = round.fallback {
        line.push_str(&format!("  ({})", fallback));
    }
    line
}

pub fn render_schedule(schedule: &Schedule) -> String {
    let mut out = String::new();
    for round in schedule.rounds() {
        out.push_str(&render_round(round));
        out.push('\n');
    }
    out.push('\n');
    out.push_str("Games per player:\n");
    for (player, games) in schedule.games_per_player() {
        out.push_str(&format!("  {:<16} {}\n", player.as_str(), games));
    }
    out
}

pub fn render_table(table: &PerformanceTable) -> String {
    let mut out = format!(
        "{:<16} {:>6} {:>5} {:>6} {:>7}\n",
        "Player", "Played", "Wins", "Losses", "Win %"
    );
    for record in &table.records {
        out.push_str(&format!(
            "{:<16} {:>6} {:>5} {:>6} {:>6.1}%\n",
            record.player.as_str(),
            record.games_played,
            record.wins,
            record.losses(),
            record.win_rate * 100.0
        ));
    }
    out
}

/// Walk every round, reading `1`, `2`, or an empty line (leave undecided)
/// from `input`. Stops prompting at end of input. Returns the final table.
pub fn play<R: BufRead, W: Write>(
    schedule: &mut Schedule,
    mut input: R,
    output: &mut W,
) -> io::Result<PerformanceTable> {
    let total = schedule.len();

    'rounds: for i in 0..total {
        let round = &schedule.rounds()[i];
        writeln!(output, "\nRound {} of {}", round.index, total)?;
        writeln!(output, "  Team 1:  {}", join(&round.team1, " & "))?;
        writeln!(output, "  Team 2:  {}", join(&round.team2, " & "))?;
        writeln!(output, "  Resting: {}", join(&round.resting, ", "))?;

        loop {
            write!(output, "Winner (1/2, blank to skip): ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break 'rounds;
            }

            match line.trim() {
                "" => break,
                answer => {
                    let outcome = answer
                        .parse::<u8>()
                        .map_err(|_| format!("expected 1 or 2, got {:?}", answer))
                        .and_then(|w| {
                            engine::set_winner(schedule, i, w).map_err(|e| e.to_string())
                        });
                    match outcome {
                        Ok(()) => break,
                        Err(message) => writeln!(output, "  {}", message)?,
                    }
                }
            }
        }
    }

    let table = engine::compute_performance(schedule);
    writeln!(output, "\nResults ({} of {} rounds decided)", schedule.decided(), total)?;
    write!(output, "{}", render_table(&table))?;
    Ok(table)
}
