use crate::errors::PeriodError;
use crate::models::{FourierAnalysis, PeriodAnalysis, PeriodStats, Spectrum, VideoRecord};
use chrono::NaiveDate;
use rustfft::{FftPlanner, num_complex::Complex};

/// Filters `videos` to the inclusive `[start, end]` window (by UTC publish
/// date) and summarises what is left. `Ok(None)` means nothing was published
/// in the window.
pub fn analyze_period(
    videos: &[VideoRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Option<PeriodAnalysis>, PeriodError> {
    if start > end {
        return Err(PeriodError::InvertedWindow { start, end });
    }

    let selected: Vec<VideoRecord> = videos
        .iter()
        .filter(|video| {
            let date = video.published_date();
            start <= date && date <= end
        })
        .cloned()
        .collect();

    if selected.is_empty() {
        return Ok(None);
    }

    let selected = sort_by_published(selected);
    let stats = build_period_stats(&selected);

    Ok(Some(PeriodAnalysis {
        videos: selected,
        stats,
    }))
}

/// Spectrum over every video in the table, oldest first.
pub fn analyze_fourier(videos: &[VideoRecord]) -> Option<FourierAnalysis> {
    if videos.is_empty() {
        return None;
    }

    let videos = sort_by_published(videos.to_vec());
    let spectrum = view_spectrum(&view_counts(&videos));
    Some(FourierAnalysis { videos, spectrum })
}

pub fn sort_by_published(mut videos: Vec<VideoRecord>) -> Vec<VideoRecord> {
    videos.sort_by_key(|video| video.published_at);
    videos
}

// `videos` is non-empty and already sorted.
fn build_period_stats(videos: &[VideoRecord]) -> PeriodStats {
    let views = view_counts(videos);
    let total_views = views.iter().fold(0u64, |acc, v| acc.saturating_add(*v));

    // Strict comparisons keep the first occurrence on ties.
    let mut max_idx = 0;
    let mut min_idx = 0;
    for (idx, value) in views.iter().enumerate() {
        if *value > views[max_idx] {
            max_idx = idx;
        }
        if *value < views[min_idx] {
            min_idx = idx;
        }
    }

    PeriodStats {
        total_videos: videos.len(),
        total_views,
        average_views: total_views as f64 / videos.len() as f64,
        max_views: views[max_idx],
        min_views: views[min_idx],
        most_viewed_video: videos[max_idx].title.clone(),
        least_viewed_video: videos[min_idx].title.clone(),
        spectrum: view_spectrum(&views),
    }
}

fn view_counts(videos: &[VideoRecord]) -> Vec<u64> {
    videos.iter().map(|video| video.views).collect()
}

/// Magnitude spectrum of `views` treated as evenly spaced samples.
pub fn view_spectrum(views: &[u64]) -> Spectrum {
    let mut buffer: Vec<Complex<f64>> = views
        .iter()
        .map(|v| Complex::new(*v as f64, 0.0))
        .collect();

    if !buffer.is_empty() {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(buffer.len());
        fft.process(&mut buffer);
    }

    Spectrum {
        frequencies: fft_frequencies(buffer.len()),
        magnitudes: buffer.iter().map(|c| c.norm()).collect(),
    }
}

/// Sample frequencies in cycles per sample, in FFT output order:
/// non-negative bins first, then the negative ones.
pub fn fft_frequencies(n: usize) -> Vec<f64> {
    let len = n as f64;
    let positive = (n + 1) / 2;
    (0..n)
        .map(|i| {
            if i < positive {
                i as f64 / len
            } else {
                (i as f64 - len) / len
            }
        })
        .collect()
}
