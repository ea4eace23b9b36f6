use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};

use crate::analytics::{self, SeriesPoint};
use crate::visual::ParticleScene;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

/// Smallest terminal the full layout fits into
const MIN_WIDTH: u16 = 44;
const MIN_HEIGHT: u16 = 12;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            // Degrade instead of panicking on absurd layouts
            let notice = Paragraph::new(Span::styled(
                "terminal too small for fokus",
                Style::default().fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            notice.render(area, buf);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // clock
                Constraint::Length(1), // key hints
                Constraint::Length(1), // aggregate stats
                Constraint::Length(1), // spacer
                Constraint::Min(5),    // chart / visualization
            ])
            .split(area);

        let clock_style = if self.clock.is_running() {
            bold_style.fg(Color::Green)
        } else {
            bold_style.fg(Color::White)
        };
        Paragraph::new(Span::styled(self.clock.format_elapsed(), clock_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let timer_hint = if self.clock.is_running() {
            "stop timer"
        } else {
            "start timer"
        };
        let visual_hint = if self.coordinator.is_visible() {
            "hide visual"
        } else {
            "show visual"
        };
        Paragraph::new(Line::from(vec![
            Span::styled("(space) ", dim_style),
            Span::raw(timer_hint),
            Span::styled("   (v) ", dim_style),
            Span::raw(visual_hint),
            Span::styled("   (esc) ", dim_style),
            Span::raw("quit"),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let now: chrono::DateTime<chrono::Local> = self.time.now().into();
        let today = analytics::format_duration(analytics::today_total(self.store.sessions(), now));
        let weekly = analytics::format_duration(analytics::week_average(self.store.sessions(), now));
        Paragraph::new(Line::from(vec![
            Span::styled("today ", dim_style),
            Span::styled(today, bold_style),
            Span::styled("   7-day avg ", dim_style),
            Span::styled(weekly, bold_style),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let bottom = chunks[4];
        if self.coordinator.should_render() {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(bottom);
            render_session_chart(self, halves[0], buf);
            if let Some(scene) = self.coordinator.scene() {
                render_scene(scene, halves[1], buf);
            }
        } else {
            render_session_chart(self, bottom, buf);
        }
    }
}

/// Line chart of the most recent sessions, minutes on y, session index
/// on x with the first/last local dates as axis labels
fn render_session_chart(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let series = analytics::recent_series(app.store.sessions(), app.config.chart_sessions);

    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.minutes as f64))
        .collect();
    let max_x = points.len().saturating_sub(1).max(1) as f64;
    let max_y = series.iter().map(|p| p.minutes).max().unwrap_or(0).max(1) as f64;

    let label_of = |p: &SeriesPoint| Span::styled(p.label.clone(), bold_style);
    let x_labels = match series.as_slice() {
        [only] => vec![label_of(only)],
        [first, .., last] => vec![label_of(first), label_of(last)],
        [] => Vec::new(),
    };

    let datasets = vec![Dataset::default()
        .name("session minutes")
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Cyan))
        .graph_type(GraphType::Line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("session")
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(Axis::default().title("minutes").bounds([0.0, max_y]).labels(vec![
            Span::styled("0", bold_style),
            Span::styled(format!("{max_y}"), bold_style),
        ]));

    chart.render(area, buf);
}

/// Project the particle scene onto the cell grid: rotate each particle
/// into camera space and scale by depth, with the pulsing focus mesh at
/// the origin
fn render_scene(scene: &ParticleScene, area: Rect, buf: &mut Buffer) {
    if area.width < 4 || area.height < 4 {
        return;
    }
    let wf = area.width as f64;
    let hf = area.height as f64;
    let cx = wf / 2.0;
    let cy = hf / 2.0;
    let (sin_a, cos_a) = scene.camera_angle.sin_cos();

    let mut plot = |sx: f64, sy: f64, symbol: &str, style: Style| {
        if sx < 0.0 || sy < 0.0 {
            return;
        }
        let (x, y) = (sx as u16, sy as u16);
        if x < area.width && y < area.height {
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        }
    };

    for p in &scene.particles {
        // Camera-space rotation around the vertical axis
        let xr = p.x * cos_a - p.z * sin_a;
        let zr = p.x * sin_a + p.z * cos_a;
        let depth = scene.camera_radius + zr;
        if depth < 1.0 {
            continue;
        }
        let sx = cx + (xr / depth) * wf * 0.45;
        let sy = cy - (p.y / depth) * hf * 0.45;
        let (r, g, b) = p.color;
        let color = Color::Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8);
        let style = if depth < scene.camera_radius {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        plot(sx, sy, "•", style);
    }

    // Focus mesh: a wireframe ring whose screen radius follows the pulse
    let (mr, mg, mb) = scene.mesh_color;
    let mesh_color = Color::Rgb((mr * 255.0) as u8, (mg * 255.0) as u8, (mb * 255.0) as u8);
    let mesh_style = Style::default().fg(mesh_color).add_modifier(Modifier::BOLD);
    let ring_x = scene.mesh_scale / scene.camera_radius * wf * 0.45;
    let ring_y = scene.mesh_scale / scene.camera_radius * hf * 0.45;
    for k in 0..12 {
        let ang = scene.mesh_rot_y + k as f64 * std::f64::consts::TAU / 12.0;
        plot(cx + ang.cos() * ring_x, cy + ang.sin() * ring_y, "∙", mesh_style);
    }
    plot(cx, cy, "◆", mesh_style);
}
