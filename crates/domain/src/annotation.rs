use crate::DamageRecord;

/// Fixed look of damage overlays. Every damage type shares it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    pub stroke_color: u32,
    pub stroke_width: u32,
    pub label_color: u32,
    pub label_offset: f64,
    pub font_scale: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            stroke_color: 0xFF0000,
            stroke_width: 2,
            label_color: 0xFF0000,
            label_offset: 5.0,
            font_scale: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Text anchored at its baseline start.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub rect: RectPrimitive,
    pub label: LabelPrimitive,
}

pub fn plan_overlays(damages: &[DamageRecord], style: &AnnotationStyle) -> Vec<Overlay> {
    damages
        .iter()
        .map(|damage| {
            let bounds = damage.bounds;
            Overlay {
                rect: RectPrimitive {
                    x: bounds.x1,
                    y: bounds.y1,
                    width: bounds.width(),
                    height: bounds.height(),
                },
                label: LabelPrimitive {
                    text: damage.label.clone(),
                    x: bounds.x1,
                    y: bounds.y1 - style.label_offset,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;

    fn damage(label: &str, corners: [f64; 4]) -> DamageRecord {
        DamageRecord::new(label, BoundingBox::from_corners(corners).expect("finite"))
    }

    #[test]
    fn rectangle_spans_corners_and_label_sits_above() {
        let overlays = plan_overlays(
            &[damage("scratch", [10.0, 20.0, 50.0, 60.0])],
            &AnnotationStyle::default(),
        );

        assert_eq!(overlays.len(), 1);
        assert_eq!(
            overlays[0].rect,
            RectPrimitive {
                x: 10.0,
                y: 20.0,
                width: 40.0,
                height: 40.0
            }
        );
        assert_eq!(overlays[0].label.text, "scratch");
        assert_eq!((overlays[0].label.x, overlays[0].label.y), (10.0, 15.0));
    }

    #[test]
    fn inverted_corners_give_negative_extent() {
        let overlays = plan_overlays(
            &[damage("dent", [30.0, 30.0, 10.0, 10.0])],
            &AnnotationStyle::default(),
        );
        assert_eq!(overlays[0].rect.width, -20.0);
        assert_eq!(overlays[0].rect.height, -20.0);
    }

    #[test]
    fn overlays_follow_damage_order() {
        let overlays = plan_overlays(
            &[
                damage("first", [0.0, 0.0, 1.0, 1.0]),
                damage("second", [2.0, 2.0, 3.0, 3.0]),
            ],
            &AnnotationStyle::default(),
        );
        let labels: Vec<_> = overlays.iter().map(|o| o.label.text.as_str()).collect();
        assert_eq!(labels, ["first", "second"]);
        assert!(plan_overlays(&[], &AnnotationStyle::default()).is_empty());
    }
}
