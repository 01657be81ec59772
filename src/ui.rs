use crate::links::LinkRegistry;
use crate::loader::SnapshotLoader;
use crate::models::{Cell, DirectoryStructure, Table};
use chrono::{DateTime, Local};
use std::fmt::Write as _;

pub type BindingId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryPanel {
    pub binding: BindingId,
    pub category: String,
    pub sub_category: String,
    pub selector: Selector,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTab {
    pub name: String,
    pub panels: Vec<SubCategoryPanel>,
}

/// Page layout mirroring the scanned directories: one tab per category, one
/// nested tab per sub-category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiTree {
    pub tabs: Vec<CategoryTab>,
}

impl UiTree {
    pub fn panels(&self) -> impl Iterator<Item = &SubCategoryPanel> {
        self.tabs.iter().flat_map(|tab| &tab.panels)
    }
}

pub struct PageMeta {
    pub title: String,
    pub scanned_at: DateTime<Local>,
}

impl PageMeta {
    pub fn new(title: impl Into<String>, scanned_at: DateTime<Local>) -> Self {
        Self {
            title: title.into(),
            scanned_at,
        }
    }
}

/// Builds the tab tree and loads each sub-category's first snapshot.
pub fn compose(structure: &DirectoryStructure, loader: &SnapshotLoader) -> UiTree {
    let mut tabs = Vec::with_capacity(structure.categories.len());
    let mut next_binding: BindingId = 0;

    for category in &structure.categories {
        let mut panels = Vec::with_capacity(category.sub_categories.len());
        for sub in &category.sub_categories {
            let selected = sub.snapshots.first().cloned();
            let table = match &selected {
                Some(id) => loader.load(&category.name, &sub.name, id),
                None => Table::default(),
            };
            panels.push(SubCategoryPanel {
                binding: next_binding,
                category: category.name.clone(),
                sub_category: sub.name.clone(),
                selector: Selector {
                    options: sub.snapshots.clone(),
                    selected,
                },
                table,
            });
            next_binding += 1;
        }
        tabs.push(CategoryTab {
            name: category.name.clone(),
            panels,
        });
    }

    UiTree { tabs }
}

pub fn render_page(tree: &UiTree, links: &LinkRegistry, meta: &PageMeta) -> String {
    let mut html = PAGE_HEAD.replace("{{TITLE}}", &html_escape(&meta.title));
    html.push_str(&render_tabs(tree));
    let _ = write!(
        html,
        r#"<p class="hint">Data scanned at {}.</p>"#,
        meta.scanned_at.format("%Y-%m-%d %H:%M:%S")
    );
    html.push_str("\n  </main>\n");
    html.push_str(&render_footer(links));
    html.push_str(PAGE_TAIL);
    html
}

fn render_tabs(tree: &UiTree) -> String {
    if tree.tabs.is_empty() {
        return r#"<p class="empty">No data found.</p>"#.to_string();
    }

    let mut html = String::from(r#"<div class="tabs">"#);
    html.push_str(r#"<div class="tab-bar" role="tablist">"#);
    for (index, tab) in tree.tabs.iter().enumerate() {
        push_tab_button(&mut html, &format!("category-{index}"), &tab.name, index == 0);
    }
    html.push_str("</div>");

    for (index, tab) in tree.tabs.iter().enumerate() {
        let _ = write!(
            html,
            r#"<section class="tab-panel{}" id="category-{index}" role="tabpanel"><div class="tabs"><div class="tab-bar nested" role="tablist">"#,
            active_class(index == 0)
        );
        for (position, panel) in tab.panels.iter().enumerate() {
            push_tab_button(
                &mut html,
                &format!("panel-{}", panel.binding),
                &panel.sub_category,
                position == 0,
            );
        }
        html.push_str("</div>");
        for (position, panel) in tab.panels.iter().enumerate() {
            render_panel(&mut html, panel, position == 0);
        }
        html.push_str("</div></section>");
    }

    html.push_str("</div>");
    html
}

fn push_tab_button(html: &mut String, target: &str, label: &str, active: bool) {
    let _ = write!(
        html,
        r#"<button class="tab{}" type="button" role="tab" data-target="{target}" aria-selected="{active}">{}</button>"#,
        active_class(active),
        html_escape(label)
    );
}

fn render_panel(html: &mut String, panel: &SubCategoryPanel, active: bool) {
    let id = panel.binding;
    let _ = write!(
        html,
        r#"<section class="tab-panel{}" id="panel-{id}" role="tabpanel">"#,
        active_class(active)
    );
    let _ = write!(
        html,
        r#"<label class="picker">Snapshot <select class="snapshot-select" data-binding="{id}" data-view="table-{id}"{}>"#,
        if panel.selector.options.is_empty() { " disabled" } else { "" }
    );
    if panel.selector.options.is_empty() {
        html.push_str(r#"<option value="">none</option>"#);
    }
    for option in &panel.selector.options {
        let selected = panel.selector.selected.as_deref() == Some(option.as_str());
        let _ = write!(
            html,
            r#"<option value="{value}"{}>{value}</option>"#,
            if selected { " selected" } else { "" },
            value = html_escape(option)
        );
    }
    let _ = write!(
        html,
        r#"</select></label><div class="table-view" id="table-{id}">{}</div></section>"#,
        render_table(&panel.table)
    );
}

pub fn render_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return r#"<p class="empty">No snapshots.</p>"#.to_string();
    }

    let mut html = format!(
        r#"<table class="snapshot-table{}"><thead><tr>"#,
        if table.is_error() { " error" } else { "" }
    );
    for column in &table.columns {
        let _ = write!(html, "<th>{}</th>", html_escape(column));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let class = match cell {
                Cell::Int(_) | Cell::Float(_) => r#" class="num""#,
                _ => "",
            };
            let _ = write!(html, "<td{class}>{}</td>", html_escape(&cell.display()));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Static footer: one link per registry entry, separated by `|`.
pub fn render_footer(links: &LinkRegistry) -> String {
    let anchors: Vec<String> = links
        .iter()
        .map(|(label, url)| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                html_escape(url),
                html_escape(label)
            )
        })
        .collect();
    format!(
        r#"  <div id="custom-footer">{}</div>"#,
        anchors.join(r#"<span class="sep">|</span>"#)
    )
}

fn active_class(active: bool) -> &'static str {
    if active { " active" } else { "" }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 72px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .tab-bar {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      width: fit-content;
    }

    .tab-bar.nested {
      margin-top: 16px;
      background: rgba(255, 107, 74, 0.1);
    }

    .tab {
      appearance: none;
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #6b645d;
      cursor: pointer;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .tab-panel {
      display: none;
    }

    .tab-panel.active {
      display: block;
    }

    .picker {
      display: flex;
      align-items: center;
      gap: 10px;
      margin: 16px 0;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .picker select {
      font: inherit;
      text-transform: none;
      letter-spacing: normal;
      padding: 6px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .table-view {
      overflow-x: auto;
      background: white;
      border-radius: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .snapshot-table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.92rem;
    }

    .snapshot-table th,
    .snapshot-table td {
      padding: 8px 12px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
      text-align: left;
      white-space: nowrap;
    }

    .snapshot-table th {
      color: var(--accent-2);
      position: sticky;
      top: 0;
      background: white;
    }

    .snapshot-table td.num {
      text-align: right;
      font-variant-numeric: tabular-nums;
    }

    .snapshot-table.error td {
      color: #c63b2b;
    }

    .empty,
    .hint {
      margin: 0;
      padding: 12px;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    #custom-footer {
      width: 100%;
      padding: 10px;
      text-align: center;
      position: fixed;
      bottom: 0;
      left: 0;
      z-index: 999;
      background: var(--card);
    }

    #custom-footer a {
      margin: 0 15px;
      text-decoration: none;
      color: var(--accent-2);
    }

    #custom-footer .sep {
      color: #b5aea6;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
    </header>
"#;

const PAGE_TAIL: &str = r#"

  <script>
    const activate = (bar, button) => {
      const container = bar.parentElement;
      bar.querySelectorAll(':scope > .tab').forEach((tab) => {
        const isActive = tab === button;
        tab.classList.toggle('active', isActive);
        tab.setAttribute('aria-selected', String(isActive));
      });
      container.querySelectorAll(':scope > .tab-panel').forEach((panel) => {
        panel.classList.toggle('active', panel.id === button.dataset.target);
      });
    };

    document.querySelectorAll('.tab-bar').forEach((bar) => {
      bar.addEventListener('click', (event) => {
        const button = event.target.closest('.tab');
        if (button && button.parentElement === bar) {
          activate(bar, button);
        }
      });
    });

    // Same output as the server-side render: whole floats keep one decimal.
    const formatCell = (value, kind) => {
      if (value === null || value === undefined) {
        return '';
      }
      if (kind === 'float' && Number.isInteger(value)) {
        return value.toFixed(1);
      }
      return String(value);
    };

    const renderTable = (table) => {
      if (!table.columns.length) {
        const empty = document.createElement('p');
        empty.className = 'empty';
        empty.textContent = 'No snapshots.';
        return empty;
      }
      const kinds = table.kinds || [];
      const el = document.createElement('table');
      el.className = table.error ? 'snapshot-table error' : 'snapshot-table';
      const head = el.createTHead().insertRow();
      table.columns.forEach((column) => {
        const th = document.createElement('th');
        th.textContent = column;
        head.appendChild(th);
      });
      const body = el.createTBody();
      table.rows.forEach((row) => {
        const tr = body.insertRow();
        row.forEach((value, index) => {
          const kind = kinds[index];
          const td = tr.insertCell();
          if (kind === 'int' || kind === 'float') {
            td.className = 'num';
          }
          td.textContent = formatCell(value, kind);
        });
      });
      return el;
    };

    // Each selector gets its own loader; the binding id and view are fixed
    // when the loader is made.
    const makeLoader = (bindingId, view) => {
      let latest = 0;
      return async (identifier) => {
        const ticket = ++latest;
        const res = await fetch(`/api/events/${bindingId}`, {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ identifier })
        });
        if (!res.ok) {
          const msg = await res.text();
          throw new Error(msg || 'Request failed');
        }
        const table = await res.json();
        if (ticket === latest) {
          view.replaceChildren(renderTable(table));
        }
      };
    };

    document.querySelectorAll('select.snapshot-select').forEach((select) => {
      const view = document.getElementById(select.dataset.view);
      const load = makeLoader(select.dataset.binding, view);
      select.addEventListener('change', () => {
        load(select.value).catch((err) => {
          view.replaceChildren(renderTable({ columns: ['error'], kinds: ['text'], rows: [[err.message]], error: true }));
        });
      });
    });
  </script>
</body>
</html>
"#;
