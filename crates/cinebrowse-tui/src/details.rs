//! Details view: four concurrent fetches with independent outcomes.

use cinebrowse_api::catalog::{CastMember, Credits, Details, MediaType, Page, Video};

use crate::generation::{Generation, GenerationCounter};
use crate::loadable::Loadable;

/// Maximum number of writer names shown.
pub const MAX_WRITERS: usize = 3;

/// Sub-resource fetched when the view opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailsPart {
    /// Full details record.
    Primary,
    /// Cast and crew.
    Credits,
    /// Similar titles.
    Similar,
    /// Recommended titles.
    Recommendations,
}

impl DetailsPart {
    /// All parts, in issue order.
    pub const ALL: [Self; 4] = [
        Self::Primary,
        Self::Credits,
        Self::Similar,
        Self::Recommendations,
    ];
}

/// Identity of the item shown plus the generation of its fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsTicket {
    /// Movie or TV.
    pub media_type: MediaType,
    /// Service ID.
    pub id: u64,
    /// Generation the fetches were issued under.
    pub generation: Generation,
}

/// Video list request for an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTicket {
    /// Movie or TV.
    pub media_type: MediaType,
    /// Service ID.
    pub id: u64,
    /// Generation of the modal opening.
    pub generation: Generation,
}

/// What the view as a whole should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailsView<'a> {
    /// Primary or credits still pending.
    Loading,
    /// Primary failed or came back empty.
    Unavailable,
    /// Primary details ready to render.
    Ready(&'a Details),
}

/// Trailer modal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoState<'a> {
    /// Modal not shown.
    Closed,
    /// Video list in flight.
    Pending,
    /// First video found.
    Playable(&'a Video),
    /// The item has no videos.
    NoVideo,
    /// Video list fetch failed.
    Failed,
}

/// Director and writers derived from credits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewSummary {
    /// First crew member credited as director.
    pub director: Option<String>,
    /// Writer and screenplay names, in credit order.
    pub writers: Vec<String>,
}

impl CrewSummary {
    /// Writers joined for display; `None` when there are none.
    #[must_use]
    pub fn writers_label(&self) -> Option<String> {
        if self.writers.is_empty() {
            None
        } else {
            Some(self.writers.join(", "))
        }
    }
}

/// Director plus at most three writers, preserving service order.
#[must_use]
pub fn crew_summary(credits: &Credits) -> CrewSummary {
    let director = credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone());
    let writers = credits
        .crew
        .iter()
        .filter(|member| member.job == "Writer" || member.job == "Screenplay")
        .take(MAX_WRITERS)
        .map(|member| member.name.clone())
        .collect();
    CrewSummary { director, writers }
}

/// Cast members that have a profile image.
#[must_use]
pub fn cast_with_profiles(credits: &Credits) -> Vec<&CastMember> {
    credits
        .cast
        .iter()
        .filter(|member| {
            member
                .profile_path
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty())
        })
        .collect()
}

/// State of one details view instance.
#[derive(Debug, Clone)]
pub struct DetailsAggregator {
    media_type: MediaType,
    id: u64,
    generation: Generation,
    primary: Loadable<Details>,
    credits: Loadable<Credits>,
    similar: Loadable<Page>,
    recommendations: Loadable<Page>,
    video_generation: GenerationCounter,
    video: Option<Loadable<Option<Video>>>,
}

impl DetailsAggregator {
    /// Creates the view state; all four parts start pending.
    #[must_use]
    pub fn open(media_type: MediaType, id: u64) -> (Self, DetailsTicket) {
        let generation = Generation::next();
        let aggregator = Self {
            media_type,
            id,
            generation,
            primary: Loadable::Pending,
            credits: Loadable::Pending,
            similar: Loadable::Pending,
            recommendations: Loadable::Pending,
            video_generation: GenerationCounter::new(),
            video: None,
        };
        let ticket = DetailsTicket {
            media_type,
            id,
            generation,
        };
        tracing::debug!(%media_type, id, "details opened");
        (aggregator, ticket)
    }

    fn accepts(&self, ticket: &DetailsTicket, part: DetailsPart) -> bool {
        let fresh = ticket.generation == self.generation;
        if !fresh {
            tracing::debug!(?part, id = ticket.id, "discarding stale details response");
        }
        fresh
    }

    /// Stores the primary record.
    pub fn apply_primary(&mut self, ticket: &DetailsTicket, outcome: anyhow::Result<Details>) -> bool {
        if !self.accepts(ticket, DetailsPart::Primary) {
            return false;
        }
        self.primary = Loadable::from_outcome(outcome, "details");
        true
    }

    /// Stores the credits.
    pub fn apply_credits(&mut self, ticket: &DetailsTicket, outcome: anyhow::Result<Credits>) -> bool {
        if !self.accepts(ticket, DetailsPart::Credits) {
            return false;
        }
        self.credits = Loadable::from_outcome(outcome, "credits");
        true
    }

    /// Stores the similar titles.
    pub fn apply_similar(&mut self, ticket: &DetailsTicket, outcome: anyhow::Result<Page>) -> bool {
        if !self.accepts(ticket, DetailsPart::Similar) {
            return false;
        }
        self.similar = Loadable::from_outcome(outcome, "similar");
        true
    }

    /// Stores the recommendations.
    pub fn apply_recommendations(
        &mut self,
        ticket: &DetailsTicket,
        outcome: anyhow::Result<Page>,
    ) -> bool {
        if !self.accepts(ticket, DetailsPart::Recommendations) {
            return false;
        }
        self.recommendations = Loadable::from_outcome(outcome, "recommendations");
        true
    }

    /// View-level state.
    #[must_use]
    pub fn view(&self) -> DetailsView<'_> {
        if self.primary.is_pending() || self.credits.is_pending() {
            return DetailsView::Loading;
        }
        match self.primary.value() {
            Some(details) if !details.is_empty() => DetailsView::Ready(details),
            _ => DetailsView::Unavailable,
        }
    }

    /// Opens the trailer modal and requests the video list.
    ///
    /// Every opening fetches again.
    pub fn request_video(&mut self) -> VideoTicket {
        let generation = self.video_generation.advance();
        self.video = Some(Loadable::Pending);
        VideoTicket {
            media_type: self.media_type,
            id: self.id,
            generation,
        }
    }

    /// Stores the video list if the modal that asked for it is still open.
    pub fn apply_video(&mut self, ticket: &VideoTicket, outcome: anyhow::Result<Vec<Video>>) -> bool {
        if self.video.is_none() || !self.video_generation.is_current(ticket.generation) {
            tracing::debug!(id = ticket.id, "discarding video response for closed modal");
            return false;
        }
        let first = outcome.map(|videos| videos.into_iter().find(|v| !v.key.trim().is_empty()));
        self.video = Some(Loadable::from_outcome(first, "videos"));
        true
    }

    /// Closes the modal and forgets its result.
    pub fn close_video(&mut self) {
        self.video = None;
        self.video_generation.advance();
    }

    /// Trailer modal state.
    #[must_use]
    pub fn video(&self) -> VideoState<'_> {
        match &self.video {
            None => VideoState::Closed,
            Some(Loadable::Pending) => VideoState::Pending,
            Some(Loadable::Failed) => VideoState::Failed,
            Some(Loadable::Ready(None)) => VideoState::NoVideo,
            Some(Loadable::Ready(Some(video))) => VideoState::Playable(video),
        }
    }

    /// Whether the modal is showing.
    #[must_use]
    pub const fn is_video_open(&self) -> bool {
        self.video.is_some()
    }

    /// Director and writers, empty until credits arrive or if they failed.
    #[must_use]
    pub fn crew(&self) -> CrewSummary {
        self.credits.value().map(crew_summary).unwrap_or_default()
    }

    /// Media type shown.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// ID shown.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Ticket for this instance's fetches.
    #[must_use]
    pub const fn ticket(&self) -> DetailsTicket {
        DetailsTicket {
            media_type: self.media_type,
            id: self.id,
            generation: self.generation,
        }
    }

    /// Primary status.
    #[must_use]
    pub const fn primary(&self) -> &Loadable<Details> {
        &self.primary
    }

    /// Credits status.
    #[must_use]
    pub const fn credits(&self) -> &Loadable<Credits> {
        &self.credits
    }

    /// Similar titles status.
    #[must_use]
    pub const fn similar(&self) -> &Loadable<Page> {
        &self.similar
    }

    /// Recommendations status.
    #[must_use]
    pub const fn recommendations(&self) -> &Loadable<Page> {
        &self.recommendations
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used)]

    use cinebrowse_api::catalog::CrewMember;

    use super::*;
    use crate::paging::tests::page;

    pub(crate) fn details(title: &str) -> Details {
        Details {
            id: 550,
            media_type: MediaType::Movie,
            title: String::from(title),
            tagline: None,
            overview: Some(String::from("An insomniac office worker...")),
            status: Some(String::from("Released")),
            release_date: Some(String::from("1999-10-15")),
            runtime: Some(139),
            vote_average: 8.4,
            vote_count: 26_280,
            revenue: Some(100_853_753),
            genres: vec![],
            poster_path: Some(String::from("/poster.jpg")),
            backdrop_path: None,
        }
    }

    fn crew(entries: &[(&str, &str)]) -> Credits {
        Credits {
            cast: vec![],
            crew: entries
                .iter()
                .zip(1_u64..)
                .map(|((name, job), id)| CrewMember {
                    id,
                    name: String::from(*name),
                    job: String::from(*job),
                    department: None,
                })
                .collect(),
        }
    }

    fn video(key: &str) -> Video {
        Video {
            key: String::from(key),
            name: String::from("Official Trailer"),
            site: String::from("YouTube"),
            kind: String::from("Trailer"),
        }
    }

    #[test]
    fn test_loading_until_primary_and_credits() {
        // Arrange
        let (mut agg, ticket) = DetailsAggregator::open(MediaType::Movie, 550);

        // Act & Assert
        assert_eq!(agg.view(), DetailsView::Loading);
        agg.apply_primary(&ticket, Ok(details("Fight Club")));
        assert_eq!(agg.view(), DetailsView::Loading);
        agg.apply_credits(&ticket, Ok(Credits::default()));
        assert!(matches!(agg.view(), DetailsView::Ready(d) if d.title == "Fight Club"));
        assert!(agg.similar().is_pending());
    }

    #[test]
    fn test_credits_failure_still_renders_primary() {
        // Arrange
        let (mut agg, ticket) = DetailsAggregator::open(MediaType::Movie, 550);

        // Act
        agg.apply_credits(&ticket, Err(anyhow::anyhow!("HTTP 500")));
        agg.apply_primary(&ticket, Ok(details("Fight Club")));

        // Assert
        assert!(matches!(agg.view(), DetailsView::Ready(_)));
        assert_eq!(agg.crew(), CrewSummary::default());
        assert!(agg.credits().is_failed());
    }

    #[test]
    fn test_primary_failure_makes_view_unavailable() {
        // Arrange
        let (mut agg, ticket) = DetailsAggregator::open(MediaType::Tv, 1);

        // Act
        agg.apply_primary(&ticket, Err(anyhow::anyhow!("HTTP 404")));
        agg.apply_credits(&ticket, Ok(Credits::default()));
        agg.apply_similar(&ticket, Ok(page(1, 1, &[1])));

        // Assert
        assert_eq!(agg.view(), DetailsView::Unavailable);
    }

    #[test]
    fn test_empty_primary_is_unavailable() {
        // Arrange
        let (mut agg, ticket) = DetailsAggregator::open(MediaType::Movie, 2);

        // Act
        agg.apply_primary(&ticket, Ok(details("  ")));
        agg.apply_credits(&ticket, Ok(Credits::default()));

        // Assert
        assert_eq!(agg.view(), DetailsView::Unavailable);
    }

    #[test]
    fn test_side_panels_resolve_independently() {
        // Arrange
        let (mut agg, ticket) = DetailsAggregator::open(MediaType::Movie, 550);

        // Act
        agg.apply_recommendations(&ticket, Err(anyhow::anyhow!("timeout")));
        agg.apply_similar(&ticket, Ok(page(1, 1, &[7, 8])));

        // Assert
        assert!(agg.recommendations().is_failed());
        assert_eq!(agg.similar().value().unwrap().items.len(), 2);
        assert!(agg.primary().is_pending());
    }

    #[test]
    fn test_responses_for_previous_item_are_discarded() {
        // Arrange
        let (_old, old_ticket) = DetailsAggregator::open(MediaType::Movie, 550);
        let (mut agg, _ticket) = DetailsAggregator::open(MediaType::Movie, 550);

        // Act
        let applied = agg.apply_primary(&old_ticket, Ok(details("Fight Club")));

        // Assert
        assert!(!applied);
        assert!(agg.primary().is_pending());
    }

    #[test]
    fn test_video_first_entry_key() {
        // Arrange
        let (mut agg, _) = DetailsAggregator::open(MediaType::Movie, 550);
        let ticket = agg.request_video();
        assert_eq!(agg.video(), VideoState::Pending);

        // Act
        agg.apply_video(&ticket, Ok(vec![video("6JnN1DmbqoU"), video("other")]));

        // Assert
        assert!(matches!(agg.video(), VideoState::Playable(v) if v.key == "6JnN1DmbqoU"));
    }

    #[test]
    fn test_no_video_available() {
        // Arrange
        let (mut agg, _) = DetailsAggregator::open(MediaType::Movie, 550);
        let ticket = agg.request_video();

        // Act
        agg.apply_video(&ticket, Ok(vec![]));

        // Assert
        assert_eq!(agg.video(), VideoState::NoVideo);
    }

    #[test]
    fn test_closing_modal_discards_result() {
        // Arrange
        let (mut agg, _) = DetailsAggregator::open(MediaType::Movie, 550);
        let ticket = agg.request_video();

        // Act
        agg.close_video();
        let applied = agg.apply_video(&ticket, Ok(vec![video("abc")]));

        // Assert
        assert!(!applied);
        assert_eq!(agg.video(), VideoState::Closed);
    }

    #[test]
    fn test_reopen_refetches_and_ignores_previous_opening() {
        // Arrange
        let (mut agg, _) = DetailsAggregator::open(MediaType::Movie, 550);
        let first = agg.request_video();
        agg.close_video();
        let second = agg.request_video();

        // Act
        let stale = agg.apply_video(&first, Ok(vec![video("old")]));

        // Assert
        assert!(!stale);
        assert_eq!(agg.video(), VideoState::Pending);
        assert_ne!(first.generation, second.generation);
    }

    #[test]
    fn test_crew_summary_director_and_writers() {
        // Arrange
        let credits = crew(&[
            ("Art Linson", "Producer"),
            ("David Fincher", "Director"),
            ("Chuck Palahniuk", "Novel"),
            ("Jim Uhls", "Screenplay"),
            ("Someone Else", "Director"),
        ]);

        // Act
        let summary = crew_summary(&credits);

        // Assert
        assert_eq!(summary.director.as_deref(), Some("David Fincher"));
        assert_eq!(summary.writers, vec![String::from("Jim Uhls")]);
    }

    #[test]
    fn test_writers_capped_in_order() {
        // Arrange
        let credits = crew(&[
            ("W1", "Writer"),
            ("S1", "Screenplay"),
            ("W2", "Writer"),
            ("W3", "Writer"),
        ]);

        // Act
        let summary = crew_summary(&credits);

        // Assert
        assert_eq!(summary.writers_label().as_deref(), Some("W1, S1, W2"));
        assert!(summary.director.is_none());
    }

    #[test]
    fn test_cast_with_profiles_skips_missing_images() {
        // Arrange
        let credits = Credits {
            cast: vec![
                CastMember {
                    id: 1,
                    name: String::from("Edward Norton"),
                    character: Some(String::from("Narrator")),
                    profile_path: Some(String::from("/en.jpg")),
                },
                CastMember {
                    id: 2,
                    name: String::from("Brad Pitt"),
                    character: Some(String::from("Tyler Durden")),
                    profile_path: None,
                },
            ],
            crew: vec![],
        };

        // Act
        let cast = cast_with_profiles(&credits);

        // Assert
        assert_eq!(cast.len(), 1);
        assert_eq!(cast.first().unwrap().name, "Edward Norton");
    }
}
