use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn status_text(&self) -> String {
        let layout = if !self.live_simulation {
            "layout paused".to_owned()
        } else if self.simulation.is_awake() {
            format!("layout alpha {:.3}", self.simulation.alpha())
        } else {
            "layout settled".to_owned()
        };

        format!(
            "{} of {} shown  |  zoom {:.1}x  |  {layout}",
            self.visible_count,
            self.facilities.len(),
            self.transform.k
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::events::MapEvent;
    use super::super::super::map::build::fixtures::model;
    use super::super::super::viewport::ZoomTransform;
    use crate::facility::FilterUpdate;

    #[test]
    fn reports_visible_share_and_zoom() {
        let mut model = model();
        assert_eq!(model.status_text(), "6 of 6 shown  |  zoom 1.0x  |  layout alpha 1.000");

        model.apply(MapEvent::Filter(FilterUpdate::State(Some("FL".to_owned()))));
        model.apply(MapEvent::Gesture(ZoomTransform {
            k: 12.5,
            x: 0.0,
            y: 0.0,
        }));
        model.live_simulation = false;
        assert_eq!(model.status_text(), "2 of 6 shown  |  zoom 12.5x  |  layout paused");
    }
}
