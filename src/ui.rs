use crate::categories;
use chrono::NaiveDate;

pub fn render_index(today: NaiveDate, name: &str) -> String {
    INDEX_HTML
        .replace("{{TODAY}}", &today.format("%A, %d %B %Y").to_string())
        .replace("{{NAME}}", &escape_html(name))
        .replace("{{CATEGORY_OPTIONS}}", &category_options())
}

fn category_options() -> String {
    categories::all()
        .iter()
        .map(|category| {
            let selected = if category.value == categories::DEFAULT_CATEGORY {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{value}"{selected}>{emoji} {label}</option>"#,
                value = escape_html(category.value),
                emoji = category.emoji,
                label = escape_html(category.label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Squirrel</title>
  <style>
    :root {
      --primary: #e8772e;
      --ink: #2d2a26;
      --paper: #fdf7ef;
      --muted: #f3e6d6;
      --danger: #c0392b;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: "Trebuchet MS", sans-serif;
      background: var(--paper);
      color: var(--ink);
      padding: 16px;
    }
    main { max-width: 420px; margin: 0 auto; display: grid; gap: 16px; }
    section { background: #fff; border-radius: 12px; padding: 16px; border: 2px solid var(--muted); }
    h1 { font-size: 22px; margin: 0; }
    h2 { font-size: 17px; margin: 0 0 12px; }
    .muted { opacity: 0.7; font-size: 14px; }
    .error { color: var(--danger); }
    .bar { height: 20px; background: var(--muted); border-radius: 10px; position: relative; overflow: hidden; }
    .fill { height: 100%; background: var(--primary); }
    .fill.over { background: var(--danger); }
    .marker { position: absolute; top: 0; width: 2px; height: 100%; background: var(--ink); }
    .grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; text-align: center; }
    .day { height: 30px; line-height: 30px; border-radius: 6px; }
    .day.entry { background: var(--primary); color: #fff; font-weight: 700; }
    .day.today { border: 2px solid var(--primary); }
    table { width: 100%; border-collapse: collapse; font-size: 14px; }
    td, th { padding: 6px; text-align: left; }
    td.amount { text-align: right; color: var(--primary); font-weight: 600; }
    form { display: flex; flex-wrap: wrap; gap: 6px; align-items: center; }
    input, select, button { font: inherit; padding: 6px; }
    .mission.done { border-color: #4caf50; }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Hi {{NAME}}!</h1>
      <div class="muted">{{TODAY}}</div>
    </header>

    <section>
      <h2>Add expense</h2>
      <form id="expense-form">
        <select name="day">
          <option value="today">TODAY</option>
          <option value="yesterday">YESTERDAY</option>
        </select>
        I spent
        <input name="amount" inputmode="decimal" placeholder="0.00" size="6" />
        <select name="mode">
          <option>UPI</option>
          <option>CASH</option>
          <option>DEBIT CARD</option>
          <option>CREDIT CARD</option>
        </select>
        on
        <select name="category">
          {{CATEGORY_OPTIONS}}
        </select>
        <input name="description" placeholder="veggies from the supermarket" />
        <button type="submit">Send</button>
      </form>
      <div id="expense-status" class="muted"></div>
    </section>

    <section id="budget"><h2>Budget Progress</h2><div class="muted">Loading budget data...</div></section>
    <section id="calendar"><h2>Calendar</h2><div class="muted">Loading...</div></section>
    <section id="expenses"><h2>Expenses This Period</h2><div class="muted">Loading...</div></section>
    <section id="missions"><h2>Missions</h2><div class="muted">Loading your mission progress...</div></section>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const esc = (value) => String(value ?? '').replace(/[&<>"']/g, (c) => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;',
    })[c]);
    const money = (n) => '₹' + esc(Number(n).toLocaleString());
    const fail = (el, title, message) => {
      el.innerHTML = `<h2>${esc(title)}</h2><div class="error">Error: ${esc(message)}</div>`;
    };

    async function getJson(url) {
      const res = await fetch(url);
      if (!res.ok) throw new Error(await res.text());
      return res.json();
    }

    function renderBudget(section) {
      const el = $('budget');
      if (section.status === 'failed') return fail(el, 'Budget Progress', section.message);
      const b = section.data;
      if (b.kind === 'no_budget') {
        el.innerHTML = `<h2>Budget Progress</h2><div class="muted">${esc(b.message)}</div>`;
        return;
      }
      el.innerHTML = `
        <h2>Budget Progress <span class="muted">Day ${esc(b.day)} of ${esc(b.days_in_period)}</span></h2>
        <div class="bar">
          <div class="fill ${b.over_budget ? 'over' : ''}" style="width:${Number(b.fill_percentage)}%"></div>
          <div class="marker" style="left:${Number(b.date_percentage)}%"></div>
        </div>
        <p>Spent ${money(b.spent)} of ${money(b.budget)} (${Number(b.budget_percentage).toFixed(1)}%)</p>
        ${b.over_budget ? `<p class="error">You're over budget by ${money(b.overage)}</p>` : ''}`;
    }

    function renderCalendar(section) {
      const el = $('calendar');
      if (section.status === 'failed') return fail(el, 'Calendar', section.message);
      const c = section.data;
      const head = ['Sun', 'Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat']
        .map((d) => `<div class="muted">${d}</div>`).join('');
      const cells = c.cells.map((cell) => {
        if (!cell) return '<div></div>';
        const cls = ['day', cell.has_entry ? 'entry' : '', cell.is_today ? 'today' : ''].join(' ');
        return `<div class="${cls}">${esc(cell.day)}</div>`;
      }).join('');
      el.innerHTML = `<h2>${esc(c.month_name)}, ${esc(c.year)}</h2>
        <div class="grid">${head}${cells}</div>
        <p class="muted">Expenses recorded on ${esc(c.entry_count)} of ${esc(c.total_days)} days in ${esc(c.month_name)}</p>`;
    }

    async function loadDashboard() {
      const view = await getJson('/api/dashboard');
      renderBudget(view.budget);
      renderCalendar(view.calendar);
    }

    async function loadExpenses() {
      const el = $('expenses');
      try {
        const table = await getJson('/api/expenses');
        const p = table.period;
        const rows = table.rows.map((r) => `<tr>
            <td>${esc(r.date)}</td><td class="amount">${money(r.amount)}</td>
            <td>${esc(r.emoji)} ${esc(r.category || '-')}</td><td>${esc(r.description || '-')}</td></tr>`).join('');
        el.innerHTML = `<h2>Expenses ${esc(p.start_date)} to ${esc(p.end_date)}</h2>
          <table><thead><tr><th>Date</th><th>Amount</th><th>Category</th><th>Description</th></tr></thead>
          <tbody>${rows || '<tr><td colspan="4" class="muted">No expenses found for this period.</td></tr>'}</tbody></table>
          <p><b>Total:</b> ${money(table.total)}</p>`;
      } catch (err) {
        fail(el, 'Expenses', err.message);
      }
    }

    async function loadMissions() {
      const el = $('missions');
      try {
        const cards = await getJson('/api/missions');
        el.innerHTML = '<h2>Missions</h2>' + cards.map((m) => `
          <div class="mission ${m.completed ? 'done' : ''}">
            <b>${esc(m.icon)} ${esc(m.title)}</b> ${m.completed ? '✓' : ''}
            <div class="muted">${esc(m.description)}</div>
            <div class="bar"><div class="fill" style="width:${Number(m.percentage)}%"></div></div>
            <div class="muted">${esc(m.progress)}/${esc(m.target)}</div>
          </div>`).join('');
      } catch (err) {
        fail(el, 'Missions', err.message);
      }
    }

    $('expense-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const status = $('expense-status');
      const res = await fetch('/api/expenses', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(Object.fromEntries(form.entries())),
      });
      if (res.ok) {
        status.textContent = 'Expense recorded!';
        event.target.reset();
        loadExpenses();
        loadDashboard();
      } else {
        status.textContent = await res.text();
      }
    });

    loadDashboard().catch((err) => fail($('budget'), 'Budget Progress', err.message));
    loadExpenses();
    loadMissions();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lists_categories_with_default_selected() {
        let html = render_index(NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(), "Asha");
        assert!(html.contains("Hi Asha!"));
        assert!(html.contains("Saturday, 25 May 2024"));
        assert!(html.contains(r#"<option value="Groceries" selected>"#));
        assert!(html.contains(r#"<option value="Card fees">"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn script_escapes_rendered_fields() {
        let html = render_index(NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(), "Asha");
        assert!(html.contains("const esc = (value)"));
        assert!(html.contains("${esc(r.description || '-')}"));
        assert!(html.contains("${esc(r.category || '-')}"));
        assert!(html.contains("Error: ${esc(message)}"));
        assert!(html.contains("${esc(m.title)}"));
        assert!(!html.contains("${r.description"));
        assert!(!html.contains("${message}"));
    }

    #[test]
    fn names_are_escaped() {
        let html = render_index(NaiveDate::from_ymd_opt(2024, 5, 25).unwrap(), "<b>x</b>");
        assert!(html.contains("Hi &lt;b&gt;x&lt;/b&gt;!"));
    }
}
