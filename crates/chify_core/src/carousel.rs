//! Hero carousel.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Default auto-advance period
pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_millis(8000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
}

impl Slide {
    fn new(title: &str, subtitle: &str, image_url: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            image_url: image_url.to_string(),
        }
    }
}

/// The five built-in hero slides
pub fn default_slides() -> Vec<Slide> {
    vec![
        Slide::new(
            "Precision in Physical Therapy",
            "Restoring movement and enhancing life through specialized care.",
            "https://images.unsplash.com/photo-1576091160550-2173dba999ef?auto=format&fit=crop&q=80&w=1600",
        ),
        Slide::new(
            "Holistic Occupational Wellness",
            "Empowering you to perform daily activities with confidence.",
            "https://images.unsplash.com/photo-1584432810601-6c7f27d2362b?auto=format&fit=crop&q=80&w=1600",
        ),
        Slide::new(
            "Advanced Neurological Care",
            "Dedicated support for recovery from stroke, injury, or illness.",
            "https://images.unsplash.com/photo-1579684385127-1ef15d508118?auto=format&fit=crop&q=80&w=1600",
        ),
        Slide::new(
            "Pediatric Rehabilitation",
            "Nurturing growth and development in every child.",
            "https://images.unsplash.com/photo-1526232761682-d26e4fca6042?auto=format&fit=crop&q=80&w=1600",
        ),
        Slide::new(
            "Compassionate Elder Care",
            "Maintaining independence and dignity through therapeutic support.",
            "https://images.unsplash.com/photo-1532938911079-1b06ac7ceec7?auto=format&fit=crop&q=80&w=1600",
        ),
    ]
}

pub struct HeroCarousel {
    slides: Vec<Slide>,
    current: usize,
    ticker: Interval,
}

impl HeroCarousel {
    /// Create a carousel on the first slide. The first auto-advance fires
    /// one full period after creation.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(slides: Vec<Slide>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            slides,
            current: 0,
            ticker,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    /// Move to the next slide, wrapping after the last
    pub fn advance(&mut self) -> usize {
        if !self.slides.is_empty() {
            self.current = (self.current + 1) % self.slides.len();
        }
        self.current
    }

    /// Jump to a slide. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.slides.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Wait for the next auto-advance tick
    pub async fn tick(&mut self) {
        self.ticker.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_advance_wraps() {
        let mut carousel = HeroCarousel::new(default_slides(), DEFAULT_SLIDE_INTERVAL);
        assert_eq!(carousel.current().unwrap().title, "Precision in Physical Therapy");

        for expected in [1, 2, 3, 4, 0] {
            assert_eq!(carousel.advance(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_bounds() {
        let mut carousel = HeroCarousel::new(default_slides(), DEFAULT_SLIDE_INTERVAL);
        assert!(carousel.select(3));
        assert_eq!(carousel.current().unwrap().title, "Pediatric Rehabilitation");
        assert!(!carousel.select(5));
        assert_eq!(carousel.current_index(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_waits_one_period() {
        let mut carousel = HeroCarousel::new(default_slides(), DEFAULT_SLIDE_INTERVAL);
        let start = Instant::now();

        carousel.tick().await;
        assert!(start.elapsed() >= DEFAULT_SLIDE_INTERVAL);

        let early = tokio::time::timeout(Duration::from_millis(7999), carousel.tick()).await;
        assert!(early.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_carousel() {
        let mut carousel = HeroCarousel::new(Vec::new(), DEFAULT_SLIDE_INTERVAL);
        assert_eq!(carousel.advance(), 0);
        assert!(carousel.current().is_none());
        assert!(!carousel.select(0));
    }
}
