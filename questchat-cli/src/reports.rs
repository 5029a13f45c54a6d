use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use questchat_game::{BadgeBoard, QuestBoard, QuizOutcome, StatsOverview};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::path::Path;

use crate::turn::ChatTurn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable, colored
    Console,
    /// Machine-readable, one JSON document per command
    Json,
}

fn write_json<W, T>(out: &mut W, value: &T) -> Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let json_output = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn announce_banner<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", "🎮 Questchat".bright_cyan().bold())?;
    writeln!(out, "{}", "============".cyan())?;
    Ok(())
}

pub fn chat_report<W: Write>(out: &mut W, format: ReportFormat, turn: &ChatTurn) -> Result<()> {
    let (reply, error) = match &turn.reply {
        Some(Ok(text)) => (Some(text.clone()), None),
        Some(Err(err)) => (None, Some(err.to_string())),
        None => (None, None),
    };
    if format == ReportFormat::Json {
        return write_json(
            out,
            &json!({ "award": turn.award, "reply": reply, "error": error }),
        );
    }

    let award = &turn.award;
    if award.awarded() {
        writeln!(
            out,
            "✨ {} ({} base × {:.1} streak multiplier)",
            format!("+{} XP", award.xp).green().bold(),
            award.base_xp,
            award.multiplier
        )?;
    } else {
        writeln!(out, "{}", "Message too short to earn XP".dimmed())?;
    }
    writeln!(out, "🔥 Streak: {}", award.streak)?;
    if award.levels_gained > 0 {
        writeln!(
            out,
            "{}",
            format!("⬆️  Level up! +{}", award.levels_gained)
                .bright_green()
                .bold()
        )?;
    }
    if let Some(title) = award.title_info.as_ref().filter(|t| t.title_changed) {
        writeln!(
            out,
            "{} {} {}",
            "🏅 New title:".bright_magenta(),
            title.new_title.icon,
            title.new_title.name.bold()
        )?;
    }
    for badge in &award.new_badges {
        writeln!(out, "🏆 {}", badge.name.yellow().bold())?;
    }
    for quest in &award.completed_quests {
        writeln!(out, "✅ Quest complete: {}", quest.green())?;
    }
    if let Some(reply) = reply {
        writeln!(out)?;
        writeln!(out, "{reply}")?;
    }
    if let Some(error) = error {
        writeln!(out, "{} {}", "❌ No reply:".red(), error.red())?;
    }
    Ok(())
}

pub fn stats_report<W: Write>(
    out: &mut W,
    format: ReportFormat,
    overview: &StatsOverview,
) -> Result<()> {
    if format == ReportFormat::Json {
        return write_json(out, overview);
    }

    let player = &overview.player;
    let title = &overview.title;
    writeln!(
        out,
        "{} {} {}",
        title.icon,
        player.name.bold(),
        format!("· {}", title.name).bright_magenta()
    )?;
    writeln!(
        out,
        "Level {}  ·  {}/100 XP  ·  {} lifetime XP",
        player.level.to_string().bold(),
        player.xp,
        player.total_xp_earned
    )?;
    if title.xp_to_next_title > 0 {
        writeln!(
            out,
            "Next title: {} in {} XP",
            title.next_title, title.xp_to_next_title
        )?;
    } else {
        writeln!(out, "Next title: {}", title.next_title)?;
    }
    writeln!(
        out,
        "🔥 Streak {} (longest {})",
        overview.streaks.current, overview.streaks.longest
    )?;
    writeln!(out)?;

    let stats = &overview.stats;
    writeln!(out, "{}", "📊 Stats".bright_yellow().bold())?;
    for (label, value) in [
        ("Health", stats.health),
        ("Energy", stats.energy),
        ("Focus", stats.focus),
        ("Discipline", stats.discipline),
        ("Productivity", stats.productivity),
        ("Consistency", stats.consistency),
    ] {
        writeln!(out, "  {label:<13}{value:>4}")?;
    }
    writeln!(out)?;

    let counters = &overview.statistics;
    writeln!(out, "{}", "📈 Statistics".bright_yellow().bold())?;
    writeln!(out, "  Messages         {}", counters.total_messages)?;
    writeln!(out, "  Average XP       {}", counters.average_xp_per_message)?;
    writeln!(out, "  Best message     {}", counters.highest_single_message_xp)?;
    writeln!(out, "  Quests completed {}", counters.quests_completed)?;
    writeln!(out, "  Personality      {}", player.personality_type)?;
    writeln!(out)?;

    badges_console(out, &overview.badges)
}

fn badges_console<W: Write>(out: &mut W, board: &BadgeBoard) -> Result<()> {
    writeln!(
        out,
        "{} {}/{}",
        "🏆 Badges".bright_yellow().bold(),
        board.total_earned,
        board.total_available
    )?;
    for badge in &board.earned {
        writeln!(out, "  {} - {}", badge.name.yellow(), badge.description)?;
    }
    for badge in &board.locked {
        writeln!(
            out,
            "  {}",
            format!("🔒 {} - {}", badge.name, badge.description).dimmed()
        )?;
    }
    Ok(())
}

pub fn badges_report<W: Write>(out: &mut W, format: ReportFormat, board: &BadgeBoard) -> Result<()> {
    if format == ReportFormat::Json {
        return write_json(out, board);
    }
    badges_console(out, board)
}

pub fn quests_report<W: Write>(
    out: &mut W,
    format: ReportFormat,
    label: &str,
    board: &QuestBoard,
) -> Result<()> {
    if format == ReportFormat::Json {
        return write_json(out, board);
    }

    writeln!(
        out,
        "{} {}/{}",
        format!("🎯 {label} quests").bright_yellow().bold(),
        board.completed_count,
        board.total_quests
    )?;
    for quest in &board.quests {
        let mark = if quest.completed {
            "✅".to_string()
        } else {
            format!("{}/{}", quest.progress, quest.target)
        };
        writeln!(out, "  [{mark}] {} ({} XP)", quest.title, quest.xp)?;
    }
    Ok(())
}

pub fn quiz_report<W: Write>(
    out: &mut W,
    format: ReportFormat,
    outcome: &QuizOutcome,
    merged: bool,
) -> Result<()> {
    if format == ReportFormat::Json {
        return write_json(
            out,
            &json!({ "code": outcome.code, "traitScores": outcome.trait_scores, "merged": merged }),
        );
    }

    writeln!(out, "🧭 Personality: {}", outcome.code.bright_cyan().bold())?;
    let scores = &outcome.trait_scores;
    for (label, value) in [
        ("Creativity", scores.creativity),
        ("Productivity", scores.productivity),
        ("Energy", scores.energy),
        ("Kindness", scores.kindness),
        ("Awareness", scores.awareness),
    ] {
        writeln!(out, "  {label:<13}{value:>4}")?;
    }
    if !merged {
        writeln!(
            out,
            "{}",
            "A personality is already on file; the profile was not changed.".yellow()
        )?;
    }
    Ok(())
}

pub fn reset_report<W: Write>(out: &mut W, format: ReportFormat, path: &Path) -> Result<()> {
    if format == ReportFormat::Json {
        let state = path.display().to_string();
        return write_json(out, &json!({ "reset": true, "state": state }));
    }
    writeln!(
        out,
        "{} {}",
        "🔄 Progress reset:".bright_yellow(),
        path.display()
    )?;
    Ok(())
}
