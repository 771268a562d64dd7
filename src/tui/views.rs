// src/tui/views.rs
use super::{App, Tab};
use crate::analytics::overview::{SessionPosition, SessionRow, SessionsOverview};
use crate::analytics::position_stats::TpProgress;
use crate::analytics::session::{checks_for_side, SideCheckSummary};
use crate::analytics::DashboardReport;
use crate::types::{CloseReason, EvaluationResult, SessionStatus, Side, SignalEvaluation, Trade};
use crate::utils::format::{fmt_date, fmt_num, fmt_pct, fmt_time, fmt_usd, humanize_condition};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const TOP_REJECTIONS: usize = 10;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    render_header(f, app, chunks[0]);

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[1]);

    match (&app.report, app.tab) {
        (_, Tab::Evaluations) => render_evaluations(f, app, chunks[2]),
        (_, Tab::Sessions) => match &app.sessions {
            Some(overview) => render_sessions(f, overview, chunks[2]),
            None => {
                let waiting = Paragraph::new("Waiting for data...")
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(waiting, chunks[2]);
            }
        },
        (Some(report), Tab::Overview) => render_overview(f, report, chunks[2]),
        (Some(report), Tab::Positions) => render_positions(f, report, chunks[2]),
        (Some(report), Tab::Trades) => render_trades(f, report, chunks[2]),
        (None, _) => {
            let waiting = Paragraph::new("Waiting for data...")
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(waiting, chunks[2]);
        }
    }

    let footer = match &app.status {
        Some(msg) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            "q quit · 1-5 tabs · a/s/r filter · ↑/↓ select · u reload",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(footer), chunks[3]);
}

fn pnl_color(value: Decimal) -> Color {
    if value > Decimal::ZERO {
        Color::Green
    } else if value < Decimal::ZERO {
        Color::Red
    } else {
        Color::DarkGray
    }
}

fn side_span(side: Side) -> Span<'static> {
    match side {
        Side::Long => Span::styled("LONG", Style::default().fg(Color::Green)),
        Side::Short => Span::styled("SHORT", Style::default().fg(Color::Red)),
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.report {
        Some(report) => {
            let s = &report.session;
            Line::from(vec![
                Span::styled(
                    format!("{} ", s.symbol),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    if s.simulation { "SIM " } else { "REAL " },
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!("{}x | {:?} | Balance: ", s.leverage, s.status)),
                Span::raw(fmt_usd(s.current_balance)),
                Span::raw(" | P&L: "),
                Span::styled(
                    format!(
                        "{} ({})",
                        fmt_usd(report.summary.pnl),
                        fmt_pct(report.summary.pnl_pct)
                    ),
                    Style::default().fg(pnl_color(report.summary.pnl)),
                ),
                Span::raw(format!(" | Open: {}", report.summary.open_positions)),
            ])
        }
        None => Line::from("Connecting..."),
    };
    let header =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(header, area);
}

fn stat_card(f: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let card = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(label.to_string()));
    f.render_widget(card, area);
}

fn render_overview(f: &mut Frame, report: &DashboardReport, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(4)].as_ref())
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6].as_ref())
        .split(rows[0]);
    let t = &report.trades;
    stat_card(f, cards[0], "Total P&L", fmt_usd(t.total_pnl), pnl_color(t.total_pnl));
    stat_card(f, cards[1], "Total Fees", fmt_usd(t.total_fees), Color::White);
    stat_card(f, cards[2], "Win Rate", format!("{}%", fmt_num(t.win_rate, 0)), Color::White);
    stat_card(f, cards[3], "Profit Factor", fmt_num(t.profit_factor, 2), Color::White);
    stat_card(f, cards[4], "Avg Win", fmt_usd(t.avg_win), Color::Green);
    stat_card(f, cards[5], "Avg Loss", fmt_usd(t.avg_loss), Color::Red);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(rows[1]);
    render_pnl_chart(f, report, middle[0]);
    render_rejections(f, report, middle[1]);

    let e = &report.efficiency;
    let p = &report.positions;
    let footer = Paragraph::new(vec![
        Line::from(format!(
            "Candles evaluated: {} | Signals: {} | Rejected: {} | Signal rate: {}%",
            e.evaluated,
            e.signals,
            e.rejected,
            fmt_num(e.signal_rate, 1)
        )),
        Line::from(format!(
            "Positions: {} open, {} closed ({} W / {} L, {}% win) | Net: {}",
            p.open_count,
            p.closed.total,
            p.closed.win_count,
            p.closed.loss_count,
            fmt_num(p.closed.win_rate, 0),
            fmt_usd(p.net_pnl)
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Signal Efficiency"));
    f.render_widget(footer, rows[2]);
}

fn render_pnl_chart(f: &mut Frame, report: &DashboardReport, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Cumulative P&L");
    if report.pnl_curve.is_empty() {
        f.render_widget(Paragraph::new("Not enough data").block(block), area);
        return;
    }

    let points: Vec<(f64, f64)> = report
        .pnl_curve
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.running_pnl.to_f64().unwrap_or(0.0)))
        .collect();
    let (min_y, max_y) = points.iter().fold((0.0_f64, 0.0_f64), |(lo, hi), &(_, y)| {
        (lo.min(y), hi.max(y))
    });
    let pad = ((max_y - min_y) * 0.1).max(1.0);
    let last = report.pnl_curve.last().map(|p| p.running_pnl).unwrap_or_default();
    let color = if last >= Decimal::ZERO { Color::Green } else { Color::Red };

    let datasets = vec![Dataset::default()
        .name("P&L")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(Axis::default().bounds([0.0, (points.len().max(2) - 1) as f64]))
        .y_axis(
            Axis::default()
                .bounds([min_y - pad, max_y + pad])
                .labels(vec![
                    Span::raw(format!("{:.0}", min_y - pad)),
                    Span::raw(format!("{:.0}", max_y + pad)),
                ]),
        );
    f.render_widget(chart, area);
}

fn render_rejections(f: &mut Frame, report: &DashboardReport, area: Rect) {
    let breakdown = &report.rejections;
    let title = format!(
        "Rejection Reasons ({} rejected / {} signals)",
        breakdown.total, breakdown.signals
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if breakdown.reasons.is_empty() {
        f.render_widget(Paragraph::new("No rejections yet").block(block), area);
        return;
    }

    let bar_room = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = breakdown
        .top(TOP_REJECTIONS)
        .iter()
        .map(|reason| {
            let width = breakdown.bar_width_pct(reason).to_usize().unwrap_or(0);
            let bar = "█".repeat(bar_room * width / 100);
            ListItem::new(vec![
                Line::from(format!(
                    "{}  {} ({}%)",
                    humanize_condition(&reason.name),
                    reason.count,
                    fmt_num(breakdown.share_pct(reason), 0)
                )),
                Line::from(Span::styled(bar, Style::default().fg(Color::Red))),
            ])
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn result_span(result: EvaluationResult) -> Span<'static> {
    match result {
        EvaluationResult::SignalLong => {
            Span::styled("⬆ LONG SIGNAL", Style::default().fg(Color::Green))
        }
        EvaluationResult::SignalShort => {
            Span::styled("⬇ SHORT SIGNAL", Style::default().fg(Color::Red))
        }
        EvaluationResult::Rejected => {
            Span::styled("— REJECTED", Style::default().fg(Color::DarkGray))
        }
    }
}

fn render_evaluations(f: &mut Frame, app: &App, area: Rect) {
    let panel = &app.evaluations;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)].as_ref())
        .split(area);

    let items: Vec<ListItem> = panel
        .rows
        .iter()
        .map(|ev| {
            let dot = match ev.result {
                EvaluationResult::SignalLong => Span::styled("● ", Style::default().fg(Color::Green)),
                EvaluationResult::SignalShort => Span::styled("● ", Style::default().fg(Color::Red)),
                EvaluationResult::Rejected => Span::styled("● ", Style::default().fg(Color::DarkGray)),
            };
            ListItem::new(Line::from(vec![
                dot,
                Span::raw(format!("{}  {}", fmt_time(&ev.created_at), fmt_num(ev.close_price, 1))),
            ]))
        })
        .collect();

    let selected_index = panel
        .selected
        .as_deref()
        .and_then(|id| panel.rows.iter().position(|e| e.id == id));
    let mut state = ListState::default().with_selected(selected_index);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Timeline [{}] {}", panel.filter.label(), panel.rows.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    f.render_stateful_widget(list, cols[0], &mut state);

    let active = selected_index.map(|i| &panel.rows[i]);
    let detail_block = Block::default().borders(Borders::ALL).title("Evaluation");
    match active {
        Some(ev) => render_evaluation_detail(f, ev, detail_block, cols[1]),
        None => {
            let msg = if panel.rows.is_empty() {
                "No evaluations yet, waiting for candle data."
            } else {
                "Select a candle to view its evaluation"
            };
            f.render_widget(Paragraph::new(msg).block(detail_block), cols[1]);
        }
    }
}

fn render_evaluation_detail(f: &mut Frame, ev: &SignalEvaluation, block: Block, area: Rect) {
    let summary = SideCheckSummary::calculate(ev);
    let mut lines = vec![
        Line::from(vec![
            result_span(ev.result),
            Span::raw(format!(
                "   LONG {}/{}  SHORT {}/{}   {}",
                summary.long_passed,
                summary.long_total,
                summary.short_passed,
                summary.short_total,
                fmt_date(&ev.created_at)
            )),
        ]),
        Line::from(format!(
            "Close {} | RSI {} | ATR {} | EMA fast {} | EMA slow {}",
            fmt_num(ev.close_price, 2),
            fmt_num(ev.rsi_value, 1),
            fmt_num(ev.atr_value, 4),
            fmt_num(ev.ema_fast_value, 2),
            fmt_num(ev.ema_slow_value, 2)
        )),
        Line::from(""),
    ];

    if ev.checks.is_empty() {
        lines.push(Line::from("No condition checks available"));
    }
    for (side, title) in [(Side::Long, "LONG Conditions"), (Side::Short, "SHORT Conditions")] {
        let checks = checks_for_side(ev, side);
        if checks.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for c in checks {
            let (mark, color) = if c.passed {
                ("✓", Color::Green)
            } else {
                ("✗", Color::Red)
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", mark), Style::default().fg(color)),
                Span::raw(format!("{:<28}", humanize_condition(&c.condition_name))),
                Span::styled(" expected ", Style::default().fg(Color::DarkGray)),
                Span::raw(c.expected_value.clone()),
                Span::styled(" got ", Style::default().fg(Color::DarkGray)),
                Span::styled(c.actual_value.clone(), Style::default().fg(color)),
            ]));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn tp_cell(targets: &[TpProgress]) -> String {
    if targets.is_empty() {
        return "—".to_string();
    }
    targets
        .iter()
        .map(|t| format!("{} {}", if t.hit { "✓" } else { "—" }, t.label))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_positions(f: &mut Frame, report: &DashboardReport, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let positions = &report.session.positions;
    let open_rows: Vec<Row> = positions
        .iter()
        .filter(|p| !p.is_closed)
        .map(|p| {
            Row::new(vec![
                Cell::from(side_span(p.side)),
                Cell::from(fmt_num(p.entry_price, 2)),
                Cell::from(fmt_num(p.qty, 6)),
                Cell::from(fmt_num(p.sl, 2)),
                Cell::from(fmt_num(p.tp, 2)),
                Cell::from(if p.trailing_active { "Active" } else { "—" }),
                Cell::from(
                    report
                        .tp_progress
                        .iter()
                        .find(|(id, _)| id == &p.id)
                        .map(|(_, targets)| tp_cell(targets))
                        .unwrap_or_else(|| tp_cell(&[])),
                ),
                Cell::from(fmt_usd(p.risk_amount)),
                Cell::from(fmt_date(&p.open_time)),
            ])
        })
        .collect();
    let open = Table::new(
        open_rows,
        [
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(13),
        ],
    )
    .header(
        Row::new(vec!["Side", "Entry", "Qty", "SL", "TP", "Trailing", "TP Progress", "Risk", "Opened"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Open Positions ({})", report.positions.open_count)),
    );
    f.render_widget(open, halves[0]);

    let closed_rows: Vec<Row> = positions
        .iter()
        .filter(|p| p.is_closed)
        .map(|p| {
            let (result, color) = if p.is_win {
                ("WIN", Color::Green)
            } else {
                ("LOSS", Color::Red)
            };
            Row::new(vec![
                Cell::from(side_span(p.side)),
                Cell::from(fmt_num(p.entry_price, 2)),
                Cell::from(fmt_num(p.original_qty, 6)),
                Cell::from(format!("{}x", p.leverage)),
                Cell::from(Span::styled(
                    fmt_usd(p.total_pnl),
                    Style::default().fg(pnl_color(p.total_pnl)),
                )),
                Cell::from(fmt_usd(p.total_fees)),
                Cell::from(p.trade_count.to_string()),
                Cell::from(Span::styled(result, Style::default().fg(color))),
                Cell::from(fmt_date(&p.open_time)),
            ])
        })
        .collect();
    let closed = Table::new(
        closed_rows,
        [
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(13),
        ],
    )
    .header(
        Row::new(vec!["Side", "Entry", "Qty", "Lev", "P&L", "Fees", "Trades", "Result", "Opened"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(format!(
        "Closed Positions ({}) | {}% win | PF {}",
        report.positions.closed.total,
        fmt_num(report.positions.closed.win_rate, 0),
        fmt_num(report.positions.closed.profit_factor, 2)
    )));
    f.render_widget(closed, halves[1]);
}

fn trade_table<'a>(trades: &'a [Trade], title: String) -> Table<'a> {
    let rows: Vec<Row> = trades
        .iter()
        .map(|t| {
            let tone = match t.close_reason() {
                CloseReason::Stop => Color::Red,
                CloseReason::Trailing => Color::Yellow,
                CloseReason::Target => Color::Green,
            };
            let reason = CloseReason::label(t.reason.as_deref()).to_string();
            Row::new(vec![
                Cell::from(t.close_time.as_ref().map(fmt_date).unwrap_or_else(|| "—".to_string())),
                Cell::from(t.symbol.as_str()),
                Cell::from(side_span(t.side)),
                Cell::from(fmt_num(t.entry_price, 2)),
                Cell::from(fmt_num(t.exit_price, 2)),
                Cell::from(fmt_num(t.qty, 6)),
                Cell::from(Span::styled(fmt_usd(t.pnl), Style::default().fg(pnl_color(t.pnl)))),
                Cell::from(Span::styled(
                    fmt_pct(t.pnl_pct),
                    Style::default().fg(pnl_color(t.pnl_pct)),
                )),
                Cell::from(fmt_usd(t.fees)),
                Cell::from(Span::styled(
                    if t.is_partial { format!("{} (partial)", reason) } else { reason },
                    Style::default().fg(tone),
                )),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(13),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Min(12),
        ],
    )
    .header(
        Row::new(vec![
            "Close Time", "Symbol", "Side", "Entry", "Exit", "Qty", "P&L", "%", "Fees", "Reason",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(title))
}

fn render_trades(f: &mut Frame, report: &DashboardReport, area: Rect) {
    let t = &report.trades;
    let title = format!(
        "Trades ({}) | P&L {} | Fees {} | {} W / {} L",
        t.total,
        fmt_usd(t.total_pnl),
        fmt_usd(t.total_fees),
        t.win_count,
        t.loss_count
    );
    f.render_widget(trade_table(&report.recent_trades, title), area);
}

fn session_row(row: &SessionRow) -> Row<'static> {
    let s = &row.session;
    let (dot, dot_color) = match s.status {
        SessionStatus::Running => ("● running", Color::Green),
        SessionStatus::Stopped => ("○ stopped", Color::DarkGray),
    };
    Row::new(vec![
        Cell::from(Span::styled(dot, Style::default().fg(dot_color))),
        Cell::from(s.symbol.clone()),
        Cell::from(if s.simulation { "SIM" } else { "REAL" }),
        Cell::from(format!("{}x", s.leverage)),
        Cell::from(fmt_usd(s.current_balance)),
        Cell::from(Span::styled(
            fmt_usd(row.summary.pnl),
            Style::default().fg(pnl_color(row.summary.pnl)),
        )),
        Cell::from(Span::styled(
            fmt_pct(row.summary.pnl_pct),
            Style::default().fg(pnl_color(row.summary.pnl_pct)),
        )),
        Cell::from(fmt_date(&s.created_at)),
    ])
}

fn position_row(tagged: &SessionPosition) -> Row<'static> {
    let p = &tagged.position;
    let (result, color, pnl) = if !p.is_closed {
        ("OPEN", Color::Cyan, None)
    } else if p.is_win {
        ("WIN", Color::Green, Some(p.total_pnl))
    } else {
        ("LOSS", Color::Red, Some(p.total_pnl))
    };
    Row::new(vec![
        Cell::from(tagged.session_symbol.clone()),
        Cell::from(side_span(p.side)),
        Cell::from(fmt_num(p.entry_price, 2)),
        Cell::from(fmt_num(p.qty, 6)),
        Cell::from(format!("{}x", p.leverage)),
        Cell::from(Span::styled(result, Style::default().fg(color))),
        Cell::from(match pnl {
            Some(v) => Span::styled(fmt_usd(v), Style::default().fg(pnl_color(v))),
            None => Span::raw("—"),
        }),
        Cell::from(fmt_date(&p.open_time)),
    ])
}

fn render_sessions(f: &mut Frame, overview: &SessionsOverview, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(25),
                Constraint::Percentage(30),
                Constraint::Percentage(45),
            ]
            .as_ref(),
        )
        .split(area);

    let sessions: Vec<Row> = overview
        .running
        .iter()
        .chain(&overview.stopped)
        .map(session_row)
        .collect();
    let sessions = Table::new(
        sessions,
        [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Min(13),
        ],
    )
    .header(
        Row::new(vec!["Status", "Symbol", "Mode", "Lev", "Balance", "P&L", "Return", "Started"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(format!(
        "Sessions ({} running / {} stopped)",
        overview.running.len(),
        overview.stopped.len()
    )));
    f.render_widget(sessions, parts[0]);

    let positions: Vec<Row> = overview
        .open_positions
        .iter()
        .chain(&overview.closed_positions)
        .map(position_row)
        .collect();
    let positions = Table::new(
        positions,
        [
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Min(13),
        ],
    )
    .header(
        Row::new(vec!["Session", "Side", "Entry", "Qty", "Lev", "State", "P&L", "Opened"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(format!(
        "Positions ({} open · {} closed)",
        overview.open_positions.len(),
        overview.closed_total
    )));
    f.render_widget(positions, parts[1]);

    let t = &overview.trade_stats;
    let title = format!(
        "{} trades across all sessions | P&L {} | Fees {} | {}% win",
        t.total,
        fmt_usd(t.total_pnl),
        fmt_usd(t.total_fees),
        fmt_num(t.win_rate, 0)
    );
    f.render_widget(trade_table(&overview.trades, title), parts[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use rust_decimal_macros::dec;

    fn progress(label: &str, hit: bool) -> TpProgress {
        TpProgress {
            sort_order: 0,
            label: label.to_string(),
            price: dec!(110),
            ratio: dec!(0.5),
            hit,
            fill_ratio: Decimal::ZERO,
        }
    }

    #[test]
    fn tp_cell_marks_hits() {
        assert_eq!(tp_cell(&[]), "—");
        assert_eq!(
            tp_cell(&[progress("TP1", true), progress("TP2", false)]),
            "✓ TP1 — TP2"
        );
    }

    #[test]
    fn draws_without_a_report() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = App::new();
        terminal.draw(|f| ui(f, &app)).unwrap();
        app.tab = Tab::Evaluations;
        terminal.draw(|f| ui(f, &app)).unwrap();
        app.tab = Tab::Sessions;
        terminal.draw(|f| ui(f, &app)).unwrap();
    }

    #[test]
    fn sessions_tab_lists_every_session() {
        let session: crate::types::Session = serde_json::from_value(serde_json::json!({
            "id": "s1", "symbol": "SOLUSDT", "leverage": 5, "status": "running",
            "startingBalance": 1000, "currentBalance": 1050,
            "createdAt": "2024-03-01T00:00:00Z"
        }))
        .unwrap();
        let mut app = App::new();
        app.tab = Tab::Sessions;
        app.on_event(crate::types::UiEvent::Sessions(Box::new(SessionsOverview::build(
            &[session],
            &[],
            Vec::new(),
        ))));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("SOLUSDT"));
        assert!(screen.contains("1 running / 0 stopped"));
    }
}
