use std::io::Write;

use view::widgets::card::CardRenderModel;
use view::widgets::detail::DetailRenderModel;

/// Writes one feed card as a short text block.
pub fn write_card(out: &mut impl Write, index: usize, card: &CardRenderModel) -> std::io::Result<()> {
    let mut badges = Vec::new();
    if card.featured {
        badges.push("featured");
    }
    if card.trending {
        badges.push("trending");
    }
    let badges = if badges.is_empty() {
        String::new()
    } else {
        format!(" [{}]", badges.join(", "))
    };

    writeln!(out, "{:>3}. {} ({}){badges}", index + 1, card.title, card.video_id)?;
    writeln!(
        out,
        "     {} | {} | {} | {}{}",
        card.location,
        card.category,
        card.duration,
        card.author.name,
        if card.author.verified { " ✓" } else { "" }
    )?;
    writeln!(
        out,
        "     {} views · {} likes · {} comments · {}",
        card.views, card.likes, card.comments, card.published
    )?;

    if !card.tags.is_empty() {
        writeln!(out, "     {}", card.tags.join(" "))?;
    }
    if let Some(travel) = &card.travel {
        writeln!(out, "     best time: {}", travel.best_time)?;
        writeln!(out, "     budget: {}", travel.budget)?;
        writeln!(
            out,
            "     trip: {} ({})",
            travel.trip_length, travel.difficulty
        )?;
        if !travel.activities.is_empty() {
            writeln!(out, "     activities: {}", travel.activities.join(", "))?;
        }
    }
    Ok(())
}

/// Writes the detail overlay: the expanded card, player state and comments.
pub fn write_detail(out: &mut impl Write, detail: &DetailRenderModel) -> std::io::Result<()> {
    let card = &detail.card;
    writeln!(out, "{}", card.title)?;
    writeln!(out, "{}", card.description)?;
    writeln!(
        out,
        "by {} ({}){}",
        card.author.name,
        card.author.avatar,
        card.author
            .followers
            .as_ref()
            .map(|followers| format!(", {followers} followers"))
            .unwrap_or_default()
    )?;
    write_card(out, 0, card)?;
    writeln!(
        out,
        "player: {} | {} | volume {:.0}% | progress {:.0}%",
        if detail.playing { "playing" } else { "paused" },
        if detail.muted { "muted" } else { "sound on" },
        detail.volume * 100.0,
        detail.progress
    )?;

    if detail.comments.is_empty() {
        writeln!(out, "no comments yet")?;
    }
    for comment in &detail.comments {
        writeln!(
            out,
            "  {} ({}, {} likes): {}",
            comment.author_name, comment.posted, comment.likes, comment.text
        )?;
    }
    Ok(())
}
