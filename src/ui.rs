use crate::models::ChannelRecord;
use chrono::NaiveDate;

pub fn render_index(channels: &[ChannelRecord], start: NaiveDate, end: NaiveDate) -> String {
    let options: String = channels
        .iter()
        .map(|channel| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape_html(&channel.id),
                escape_html(&channel.name)
            )
        })
        .collect();

    let notice = if channels.is_empty() {
        "No channel data was loaded."
    } else {
        ""
    };

    INDEX_HTML
        .replace("{{CHANNEL_OPTIONS}}", &options)
        .replace("{{START}}", &start.format("%Y-%m-%d").to_string())
        .replace("{{END}}", &end.format("%Y-%m-%d").to_string())
        .replace("{{NOTICE}}", notice)
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
  <title>YouTube Channel Analyzer</title>
  <style>
    :root {
      --bg-1: #eef2f6;
      --bg-2: #cfe0ee;
      --ink: #1f2a33;
      --accent: #e0473a;
      --accent-2: #2f4858;
      --accent-3: #4f9d69;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f7f9fb 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(1.8rem, 3.5vw, 2.4rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 8px;
      font-size: 1.15rem;
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      align-items: end;
      gap: 14px;
    }

    .controls label {
      display: grid;
      gap: 4px;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #6b7680;
    }

    select,
    input[type="date"] {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.25);
      background: white;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 11px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      color: white;
      background: var(--accent-2);
    }

    button[data-action="period"] {
      background: var(--accent);
    }

    button[data-action="fourier"] {
      background: var(--accent-3);
    }

    button:disabled {
      opacity: 0.5;
      cursor: progress;
    }

    .busy {
      display: none;
      font-size: 0.9rem;
      color: #6b7680;
    }

    .busy.active {
      display: inline-block;
    }

    .chart-card {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke-width: 2;
    }

    .chart-point {
      fill: white;
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #6f7a84;
      font-size: 11px;
    }

    .summary {
      white-space: pre-line;
      font-size: 0.95rem;
      line-height: 1.5;
      margin: 0;
    }

    .notice {
      color: #c63b2b;
      min-height: 1.2em;
      margin: 0;
    }

    #output {
      display: grid;
      gap: 18px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>YouTube Channel Analyzer</h1>
      <p class="notice" id="notice">{{NOTICE}}</p>
    </header>

    <section class="controls">
      <label>Channel
        <select id="channel">{{CHANNEL_OPTIONS}}</select>
      </label>
      <label>Start date
        <input type="date" id="start" value="{{START}}" />
      </label>
      <label>End date
        <input type="date" id="end" value="{{END}}" />
      </label>
      <button type="button" data-action="stats">Channel stats</button>
      <button type="button" data-action="period">Time period analysis</button>
      <button type="button" data-action="fourier">Fourier analysis</button>
      <span class="busy" id="busy">Working...</span>
    </section>

    <section id="output"></section>
  </main>

  <script>
    const channelEl = document.getElementById('channel');
    const startEl = document.getElementById('start');
    const endEl = document.getElementById('end');
    const busyEl = document.getElementById('busy');
    const outputEl = document.getElementById('output');
    const buttons = Array.from(document.querySelectorAll('button[data-action]'));

    const WIDTH = 600;
    const HEIGHT = 280;
    const PAD_X = 64;
    const PAD_Y = 40;
    const TOP = 20;

    const escapeText = (value) =>
      String(value).replace(/[&<>"']/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' })[c]);

    const formatNumber = (value, decimals = 0) => {
      if (typeof value !== 'number' || Number.isNaN(value)) {
        return '--';
      }
      return value.toLocaleString(undefined, { maximumFractionDigits: decimals, minimumFractionDigits: decimals });
    };

    const formatAxisValue = (value) => {
      const abs = Math.abs(value);
      if (abs >= 1e6) {
        return `${(value / 1e6).toFixed(1)}M`;
      }
      if (abs >= 1e3) {
        return `${(value / 1e3).toFixed(1)}k`;
      }
      return Number.isInteger(value) ? value.toString() : value.toFixed(2);
    };

    const card = (title) => {
      const section = document.createElement('div');
      section.className = 'chart-card';
      section.innerHTML = `<h2>${escapeText(title)}</h2>`;
      outputEl.appendChild(section);
      return section;
    };

    const svg = (body) =>
      `<svg class="chart" viewBox="0 0 ${WIDTH} ${HEIGHT}" role="img">${body}</svg>`;

    const yAxis = (min, max, y) => {
      let grid = '';
      const ticks = 4;
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + ((max - min) * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${PAD_X}" y1="${yPos}" x2="${WIDTH - PAD_X}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${PAD_X - 8}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }
      return grid;
    };

    const lineChart = (points, color, withDots) => {
      if (!points.length) {
        return svg('<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>');
      }

      const xs = points.map((p) => p.x);
      const ys = points.map((p) => p.y);
      let minX = Math.min(...xs);
      let maxX = Math.max(...xs);
      let min = Math.min(0, ...ys);
      let max = Math.max(...ys);
      if (min === max) {
        max += 1;
      }
      if (minX === maxX) {
        minX -= 1;
        maxX += 1;
      }

      const x = (value) => PAD_X + ((value - minX) / (maxX - minX)) * (WIDTH - PAD_X * 2);
      const y = (value) => HEIGHT - PAD_Y - ((value - min) / (max - min)) * (HEIGHT - TOP - PAD_Y);

      const path = points
        .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(p.x).toFixed(2)} ${y(p.y).toFixed(2)}`)
        .join(' ');

      const labelEvery = Math.max(1, Math.ceil(points.length / 6));
      const xLabels = points
        .map((p, i) =>
          i % labelEvery === 0
            ? `<text class="chart-label" x="${x(p.x)}" y="${HEIGHT - PAD_Y + 18}" text-anchor="middle">${escapeText(p.label)}</text>`
            : ''
        )
        .join('');

      const dots = withDots
        ? points
            .map((p) => `<circle class="chart-point" style="stroke:${color}" cx="${x(p.x)}" cy="${y(p.y)}" r="3"><title>${escapeText(p.title || p.label)}</title></circle>`)
            .join('')
        : '';

      return svg(`${yAxis(min, max, y)}<path class="chart-line" style="stroke:${color}" d="${path}" />${dots}${xLabels}`);
    };

    const barChart = (bars, color) => {
      if (!bars.length) {
        return svg('<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>');
      }

      const max = Math.max(1, ...bars.map((b) => b.value));
      const slot = (WIDTH - PAD_X * 2) / bars.length;
      const barWidth = Math.max(6, slot * 0.6);
      const y = (value) => HEIGHT - PAD_Y - (value / max) * (HEIGHT - TOP - PAD_Y);

      const body = bars
        .map((b, i) => {
          const cx = PAD_X + slot * i + slot / 2;
          const top = y(b.value);
          return `<rect x="${cx - barWidth / 2}" y="${top}" width="${barWidth}" height="${HEIGHT - PAD_Y - top}" fill="${color}" rx="4" />`
            + `<text class="chart-label" x="${cx}" y="${top - 4}" text-anchor="middle">${formatNumber(b.value)}</text>`
            + `<text class="chart-label" x="${cx}" y="${HEIGHT - PAD_Y + 16}" text-anchor="middle">${escapeText(b.label.slice(0, 16))}</text>`;
        })
        .join('');

      return svg(`${yAxis(0, max, y)}${body}`);
    };

    const viewSeries = (points) =>
      points.map((p) => ({
        x: Date.parse(p.published_at),
        y: p.views,
        label: p.published_at.slice(0, 10),
        title: `${p.title} (${formatNumber(p.views)} views)`
      }));

    const positiveSpectrum = (spectrum) =>
      spectrum.frequencies
        .map((f, i) => ({ x: f, y: spectrum.magnitudes[i], label: f.toFixed(2) }))
        .filter((p) => p.x > 0);

    const fetchJson = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || `Request failed (${res.status})`);
      }
      return res.json();
    };

    const partialNote = (data) =>
      data.fetched_videos < data.requested_videos
        ? `\n(${data.requested_videos - data.fetched_videos} of ${data.requested_videos} videos could not be fetched)`
        : '';

    const showChannelStats = async () => {
      const data = await fetchJson('/api/channels');
      const bars = (key) => data.channels.map((c) => ({ label: c.name, value: c[key] }));
      card('YouTube subscribers count').innerHTML += barChart(bars('subscribers'), 'skyblue');
      card('YouTube videos count').innerHTML += barChart(bars('total_videos'), 'lightgreen');
    };

    const showPeriodAnalysis = async () => {
      const params = new URLSearchParams({ channel: channelEl.value, start: startEl.value, end: endEl.value });
      const data = await fetchJson(`/api/period?${params}`);
      if (!data.analysis) {
        card(`No videos from ${data.channel} between ${data.start_date} and ${data.end_date}`)
          .innerHTML += `<p class="summary">${escapeText(partialNote(data).trim())}</p>`;
        return;
      }

      const { points, stats } = data.analysis;
      card(`View count analysis (${data.start_date} to ${data.end_date}) - ${data.channel}`)
        .innerHTML += lineChart(viewSeries(points), '#2f6fb0', true);
      card('Frequency spectrum (FFT)').innerHTML += lineChart(positiveSpectrum(stats.spectrum), 'red', false);

      const summary = [
        `Total videos: ${stats.total_videos}`,
        `Total views: ${formatNumber(stats.total_views)}`,
        `Average views: ${formatNumber(stats.average_views)}`,
        `Maximum views: ${formatNumber(stats.max_views)}`,
        `Minimum views: ${formatNumber(stats.min_views)}`,
        '',
        `Most viewed video: ${stats.most_viewed_video}`,
        `Least viewed video: ${stats.least_viewed_video}`
      ].join('\n');
      card('Period analysis summary').innerHTML += `<p class="summary">${escapeText(summary + partialNote(data))}</p>`;
    };

    const showFourierAnalysis = async () => {
      const params = new URLSearchParams({ channel: channelEl.value });
      const data = await fetchJson(`/api/fourier?${params}`);
      card(`View count over time - ${data.channel}`).innerHTML += lineChart(viewSeries(data.points), 'blue', false);
      const spectrum = data.spectrum ? positiveSpectrum(data.spectrum) : [];
      card('Frequency spectrum (FFT)').innerHTML += lineChart(spectrum, 'red', false);
      const note = partialNote(data).trim();
      if (note) {
        card('Note').innerHTML += `<p class="summary">${escapeText(note)}</p>`;
      }
    };

    const actions = {
      stats: { label: 'Failed to show channel stats', run: showChannelStats },
      period: { label: 'Failed to analyze time period', run: showPeriodAnalysis },
      fourier: { label: 'Failed to show Fourier analysis', run: showFourierAnalysis }
    };

    const setBusy = (busy) => {
      busyEl.classList.toggle('active', busy);
      buttons.forEach((button) => {
        button.disabled = busy;
      });
    };

    buttons.forEach((button) => {
      button.addEventListener('click', async () => {
        const action = actions[button.dataset.action];
        if (button.dataset.action !== 'stats' && !channelEl.value) {
          window.alert(`${action.label}: no channel selected`);
          return;
        }
        setBusy(true);
        outputEl.innerHTML = '';
        try {
          await action.run();
        } catch (err) {
          window.alert(`${action.label}: ${err.message}`);
        } finally {
          setBusy(false);
        }
      });
    });
  </script>
</body>
</html>
"#;
