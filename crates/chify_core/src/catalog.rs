//! Static service catalog.
//!
//! Loaded once at startup and never mutated. Records are shared through
//! `Arc` so the service dialog can hold one without copying.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// A rehabilitation program offered by the clinic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub slug: String,
    pub title: String,
    /// Card text
    pub summary: String,
    /// Dialog text
    pub description: String,
    pub image_url: String,
    pub features: Vec<String>,
}

impl ServiceRecord {
    fn new(
        slug: &str,
        title: &str,
        summary: &str,
        description: &str,
        image_url: &str,
        features: [&str; 4],
    ) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Features shown on the card before "+ More"
    pub fn preview_features(&self) -> &[String] {
        &self.features[..self.features.len().min(2)]
    }
}

#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    records: Vec<Arc<ServiceRecord>>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ServiceCatalog {
    pub fn new(records: Vec<ServiceRecord>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    /// The six programs shown on the services section
    pub fn builtin() -> Self {
        Self::new(vec![
            ServiceRecord::new(
                "physical-therapy",
                "Physical Therapy",
                "Specialized movement analysis and manual therapy to resolve pain and dysfunction.",
                "Our physical therapy department utilizes evidence-based practices to help patients regain mobility, strength, and function. We treat everything from post-operative orthopedic cases to chronic pain syndromes using a mix of manual techniques and advanced equipment.",
                "https://images.unsplash.com/photo-1597452485669-2c7bb5fef90d?auto=format&fit=crop&q=80&w=800",
                ["Gait Training", "Manual Therapy", "Post-Op Recovery", "Pain Management"],
            ),
            ServiceRecord::new(
                "neurological-rehab",
                "Neurological Rehab",
                "Focused care for stroke, brain injury, and spinal cord condition recovery.",
                "Recovery from neurological injury requires a specialized, multidisciplinary approach. Our neuro-rehab program focuses on neuroplasticity, helping patients relearn skills and adapt to changes in their nervous system with cutting-edge robotic assistance.",
                "https://images.unsplash.com/photo-1551076805-e1869033e561?auto=format&fit=crop&q=80&w=800",
                ["Stroke Recovery", "Brain Injury Care", "Spinal Support", "Robotic Assistance"],
            ),
            ServiceRecord::new(
                "pediatric-care",
                "Pediatric Care",
                "Specialized therapy for developmental delays and childhood physical challenges.",
                "Children are not just small adults. Our pediatric specialists use play-based therapy to help children reach developmental milestones, overcome physical limitations, and participate fully in school and play.",
                "https://images.unsplash.com/photo-1516627145497-ae6968895b74?auto=format&fit=crop&q=80&w=800",
                ["Developmental Screening", "Sensory Integration", "Play Therapy", "Parent Training"],
            ),
            ServiceRecord::new(
                "occupational-therapy",
                "Occupational Therapy",
                "Helping you regain the skills needed for daily living and work tasks.",
                "We focus on \"occupations\", the activities that give life meaning. Our OTs work with you to modify environments and develop skills for self-care, productivity, and leisure, ensuring you can live life to its fullest.",
                "https://images.unsplash.com/photo-1573497019940-1c28c88b4f3e?auto=format&fit=crop&q=80&w=800",
                ["Daily Living Skills", "Ergonomic Assessment", "Adaptive Equipment", "Home Modification"],
            ),
            ServiceRecord::new(
                "speech-language",
                "Speech & Language",
                "Comprehensive evaluation and treatment of communication and swallowing disorders.",
                "Our speech-language pathologists provide expert care for individuals with communication difficulties, voice disorders, and swallowing problems (dysphagia). We use the latest diagnostic tools to create effective treatment plans.",
                "https://images.unsplash.com/photo-1559757175-5700dde675bc?auto=format&fit=crop&q=80&w=800",
                ["Articulation Therapy", "Swallowing Safety", "Cognitive Support", "Voice Coaching"],
            ),
            ServiceRecord::new(
                "sports-recovery",
                "Sports Recovery",
                "High-performance rehabilitation for athletes to return to peak condition.",
                "Return to the field faster and stronger. Our sports medicine team focuses on biomechanics and performance optimization to not only heal injuries but prevent future ones.",
                "https://images.unsplash.com/photo-1594882645126-14020914d58d?auto=format&fit=crop&q=80&w=800",
                ["Athletic Screening", "Performance Training", "Injury Prevention", "Rapid Recovery"],
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ServiceRecord>> {
        self.records.iter()
    }

    /// Record at a 0-based card position
    pub fn get(&self, index: usize) -> Option<Arc<ServiceRecord>> {
        self.records.get(index).cloned()
    }

    /// Find a record by slug or title, ignoring case
    pub fn find(&self, key: &str) -> CoreResult<Arc<ServiceRecord>> {
        let key = key.trim();
        self.records
            .iter()
            .find(|r| r.slug.eq_ignore_ascii_case(key) || r.title.eq_ignore_ascii_case(key))
            .cloned()
            .ok_or_else(|| CoreError::ServiceNotFound(key.to_string()))
    }
}
