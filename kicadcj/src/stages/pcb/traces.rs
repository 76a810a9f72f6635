use std::collections::HashMap;

use crate::circuit_json::{LayerRef, PcbTrace, PcbTraceRoutePoint, RouteType};
use crate::context::ConverterContext;
use crate::defaults;
use crate::parser::Segment;
use crate::stages::pcb::layers::copper_layer;
use crate::stages::{stage_state, ConverterStage};

/// Groups copper segments by (net, layer) into one `pcb_trace` per group.
#[derive(Debug, Default)]
pub struct CollectTracesStage {
    finished: bool,
}

impl ConverterStage for CollectTracesStage {
    stage_state!("CollectTracesStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(pcb), Some(transform), Some(nets)) = (
            ctx.kicad_pcb.clone(),
            ctx.pcb_transform,
            ctx.net_names.as_ref(),
        ) else {
            return false;
        };

        for ((net, layer), segments) in group_segments(&pcb.segments) {
            let mut route = Vec::with_capacity(segments.len() + 1);
            for (i, segment) in segments.iter().enumerate() {
                let (Some(start), Some(end)) = (segment.start, segment.end) else {
                    continue;
                };
                let width = segment.width.unwrap_or(defaults::trace::WIDTH);
                let point = |p| {
                    let p = transform.apply(p);
                    PcbTraceRoutePoint {
                        route_type: RouteType::Wire,
                        x: p.x,
                        y: p.y,
                        width,
                        layer,
                    }
                };
                if i == 0 {
                    route.push(point(start));
                }
                route.push(point(end));
            }

            ctx.db.pcb_trace.insert(PcbTrace {
                net_name: nets.name(net),
                route,
                ..Default::default()
            });
            ctx.stats.traces += 1;
        }

        false
    }
}

/// Segments with both endpoints, grouped by (net id, layer) in first-seen order.
fn group_segments(segments: &[Segment]) -> Vec<((u32, LayerRef), Vec<&Segment>)> {
    let mut groups: Vec<((u32, LayerRef), Vec<&Segment>)> = Vec::new();
    let mut index: HashMap<(u32, LayerRef), usize> = HashMap::new();

    for segment in segments.iter().filter(|s| s.start.is_some() && s.end.is_some()) {
        let key = (
            segment.net.unwrap_or(0),
            copper_layer(segment.layer.as_deref().unwrap_or("F.Cu")),
        );
        match index.get(&key) {
            Some(&i) => groups[i].1.push(segment),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![segment]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Point2;

    fn segment(net: u32, layer: &str, start: (f64, f64), end: (f64, f64)) -> Segment {
        Segment {
            start: Some(Point2::new(start.0, start.1)),
            end: Some(Point2::new(end.0, end.1)),
            layer: Some(layer.to_string()),
            net: Some(net),
            ..Default::default()
        }
    }

    #[test]
    fn test_grouping_first_seen_order() {
        let segments = vec![
            segment(2, "F.Cu", (0., 0.), (1., 0.)),
            segment(1, "F.Cu", (0., 5.), (1., 5.)),
            segment(2, "B.Cu", (1., 0.), (2., 0.)),
            segment(2, "F.Cu", (1., 0.), (1., 1.)),
        ];
        let groups = group_segments(&segments);
        let keys: Vec<_> = groups.iter().map(|(k, v)| (*k, v.len())).collect();
        assert_eq!(
            keys,
            vec![
                ((2, LayerRef::Top), 2),
                ((1, LayerRef::Top), 1),
                ((2, LayerRef::Bottom), 1),
            ]
        );
    }

    #[test]
    fn test_incomplete_segments_skipped() {
        let segments = vec![Segment {
            start: Some(Point2::new(0., 0.)),
            ..Default::default()
        }];
        assert!(group_segments(&segments).is_empty());
    }
}
