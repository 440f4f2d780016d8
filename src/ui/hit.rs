use crate::data::EventId;
use crate::ui::event_form::Field;
use ratatui::layout::Rect;

/// Something a mouse click can land on.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Day(u32),
    PrevMonth,
    NextMonth,
    PopoverBody,
    ViewTimeline,
    Backdrop,
    TimelineBody,
    TimelineClose,
    TimelineEdit(EventId),
    TimelineDelete(EventId),
    FormBody,
    FormField(Field),
    FormSubmit,
    FormClose,
}

/// Clickable regions recorded while drawing. Later regions sit on top of
/// earlier ones, so a lookup walks the list backwards.
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    pub fn target_at(&self, column: u16, row: u16) -> Option<&Target> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| contains(*area, column, row))
            .map(|(_, target)| target)
    }

    #[cfg(test)]
    pub fn area_of(&self, target: &Target) -> Option<Rect> {
        self.regions
            .iter()
            .rev()
            .find(|(_, t)| t == target)
            .map(|(area, _)| *area)
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_at_prefers_topmost() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 80, 24), Target::Backdrop);
        hits.push(Rect::new(10, 5, 20, 10), Target::TimelineBody);
        hits.push(Rect::new(12, 7, 6, 1), Target::TimelineEdit(EventId::from("a")));

        assert_eq!(hits.target_at(0, 0), Some(&Target::Backdrop));
        assert_eq!(hits.target_at(11, 6), Some(&Target::TimelineBody));
        assert_eq!(
            hits.target_at(13, 7),
            Some(&Target::TimelineEdit(EventId::from("a")))
        );
    }

    #[test]
    fn test_target_at_outside_everything() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 5, 2), Target::Day(1));
        assert_eq!(hits.target_at(5, 0), None);
        assert_eq!(hits.target_at(0, 2), None);
    }

    #[test]
    fn test_empty_regions_are_ignored() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 0, 3), Target::Day(1));
        assert_eq!(hits.area_of(&Target::Day(1)), None);
    }

    #[test]
    fn test_clear_removes_regions() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0, 0, 5, 2), Target::Day(1));
        hits.clear();
        assert_eq!(hits.target_at(1, 1), None);
    }
}
