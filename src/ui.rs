use crate::progression::{ProgressSnapshot, Tier};
use crate::rewards::Action;

const FORM_ACTIONS: [Action; 6] = [
    Action::CompleteHabit,
    Action::JournalEntry,
    Action::CreateGoal,
    Action::CompleteGoal,
    Action::CompleteExercise,
    Action::CompleteRitual,
];

pub fn render_index(snapshot: &ProgressSnapshot, pending: Option<&Tier>) -> String {
    let next = match &snapshot.next_tier {
        Some(next) => format!("{} XP to {}", snapshot.xp_to_next, escape(&next.name)),
        None => "Maximum level reached".to_string(),
    };

    INDEX_HTML
        .replace("{{ACCENT}}", accent(snapshot.tier.level))
        .replace("{{LEVEL}}", &snapshot.tier.level.to_string())
        .replace("{{NAME}}", &escape(&snapshot.tier.name))
        .replace("{{XP}}", &snapshot.xp.to_string())
        .replace("{{PERCENT}}", &snapshot.percent.to_string())
        .replace("{{NEXT}}", &next)
        .replace("{{UNLOCK}}", &escape(&snapshot.tier.unlock))
        .replace("{{LEVEL_UP}}", &pending.map(render_level_up).unwrap_or_default())
        .replace("{{FORMS}}", &render_forms())
}

fn render_level_up(tier: &Tier) -> String {
    format!(
        r#"<section class="level-up">
      <h2>Level Up! {name}</h2>
      <p>New unlock: <strong>{unlock}</strong></p>
      <form method="post" action="/level-up/ack"><button type="submit">Continue Journey</button></form>
    </section>"#,
        name = escape(&tier.name),
        unlock = escape(&tier.unlock),
    )
}

fn render_forms() -> String {
    FORM_ACTIONS
        .iter()
        .map(|action| {
            format!(
                r#"<form method="post" action="/log/{action}"><button type="submit">{label} +{xp}</button></form>"#,
                label = label(*action),
                xp = action.xp(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

fn label(action: Action) -> &'static str {
    match action {
        Action::CompleteHabit => "Habit",
        Action::JournalEntry => "Journal",
        Action::CreateGoal => "New goal",
        Action::CompleteGoal => "Goal done",
        Action::CompleteExercise => "Exercise",
        Action::CompleteRitual => "Ritual",
        _ => action.as_str(),
    }
}

fn accent(level: u32) -> &'static str {
    match level {
        1 => "#9ca3af",
        2 => "#34d399",
        3 => "#6366f1",
        4 => "#f97316",
        5 => "#c084fc",
        6 => "#f59e0b",
        7 => "#2dd4bf",
        8 => "#fb7185",
        9 => "#fbbf24",
        _ => "#d4a574",
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>XP Ladder</title>
  <style>
    :root {
      --bg: #0f0f12;
      --card: rgba(255, 255, 255, 0.05);
      --ink: #f3f0ea;
      --muted: #8b857d;
      --gold: #d4a574;
      --accent: {{ACCENT}};
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, #2a2118, transparent 60%), var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border: 1px solid rgba(212, 165, 116, 0.2);
      border-radius: 28px;
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    .badge {
      display: flex;
      align-items: center;
      gap: 16px;
    }

    .badge .level {
      width: 64px;
      height: 64px;
      border-radius: 50%;
      background: var(--accent);
      display: grid;
      place-items: center;
      font-size: 1.6rem;
      font-weight: 700;
      color: #111;
    }

    .badge h1 {
      margin: 0;
      font-size: 1.8rem;
      color: var(--accent);
    }

    .muted {
      margin: 0;
      color: var(--muted);
    }

    .bar {
      height: 12px;
      background: #27272a;
      border-radius: 999px;
      overflow: hidden;
    }

    .bar .fill {
      height: 100%;
      width: {{PERCENT}}%;
      background: var(--accent);
    }

    .unlock {
      padding: 12px 16px;
      border-radius: 12px;
      background: rgba(212, 165, 116, 0.1);
      color: var(--gold);
    }

    .level-up {
      padding: 20px;
      border-radius: 16px;
      border: 1px solid var(--gold);
      text-align: center;
    }

    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    button {
      width: 100%;
      border: none;
      border-radius: 999px;
      padding: 12px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--gold);
      color: #111;
    }
  </style>
</head>
<body>
  <main class="app">
    {{LEVEL_UP}}
    <section class="badge">
      <div class="level">{{LEVEL}}</div>
      <div>
        <h1>{{NAME}}</h1>
        <p class="muted">Level {{LEVEL}} &middot; {{XP}} XP</p>
      </div>
    </section>

    <section>
      <div class="bar"><div class="fill"></div></div>
      <p class="muted">{{PERCENT}}% &middot; {{NEXT}}</p>
    </section>

    <div class="unlock">Current unlock: {{UNLOCK}}</div>

    <section class="actions">
      {{FORMS}}
    </section>
  </main>
</body>
</html>
"#;
