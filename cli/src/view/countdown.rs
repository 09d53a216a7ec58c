use crossterm_style::{style, Color};

pub const BAR_WIDTH: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
  Relaxed,
  Soon,
  Urgent,
}

impl Urgency {
  /// Urgent in the last quarter of the period, soon in the second half.
  pub fn of(total: i64, left: i64) -> Urgency {
    if left * 4 <= total {
      Urgency::Urgent
    } else if left * 2 <= total {
      Urgency::Soon
    } else {
      Urgency::Relaxed
    }
  }

  pub fn color(self) -> Color {
    match self {
      Urgency::Relaxed => Color::Green,
      Urgency::Soon => Color::Yellow,
      Urgency::Urgent => Color::Red,
    }
  }
}

/// Filled cells for the elapsed part of the period, empty cells for what is left.
pub fn bar_cells(total: i64, left: i64) -> String {
  let filled = if total <= 0 {
    BAR_WIDTH
  } else {
    let elapsed = (total - left.clamp(0, total)) as usize;
    (elapsed * BAR_WIDTH / total as usize).min(BAR_WIDTH)
  };

  format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn progress_bar(total: i64, left: i64) -> String {
  format!(
    "{}",
    style(bar_cells(total, left)).with(Urgency::of(total, left).color())
  )
}
