use super::particle::Particle;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// Linear falloff: 1 at distance 0, 0 at the threshold and beyond.
pub fn falloff(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (1.0 - (distance / threshold)).clamp(0.0, 1.0)
}

/// Collects every unordered pair closer than `threshold`.
///
/// Plain O(n²) sweep; fine for the hundred or so particles a viewport gets.
pub fn connect_into(particles: &[Particle], threshold: f32, out: &mut Vec<Connection>) {
    out.clear();
    let threshold_sq = threshold * threshold;

    for (i, a) in particles.iter().enumerate() {
        for (j, b) in particles.iter().enumerate().skip(i + 1) {
            let distance_sq = (a.position - b.position).length_sq();
            if distance_sq >= threshold_sq {
                continue;
            }

            let distance = distance_sq.sqrt();
            out.push(Connection {
                a: i,
                b: j,
                distance,
                alpha: falloff(distance, threshold),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, pos2};

    use super::super::particle::ParticleShape;
    use super::*;
    use crate::scene::Rgba;

    fn particle(id: usize, x: f32, y: f32) -> Particle {
        Particle {
            id,
            position: pos2(x, y),
            velocity: Vec2::ZERO,
            radius: 2.0,
            opacity: 0.6,
            color: Rgba::new(120, 192, 145, 0.6),
            shape: ParticleShape::Circle,
        }
    }

    #[test]
    fn falloff_is_linear_and_reaches_zero_at_threshold() {
        assert_eq!(falloff(0.0, 150.0), 1.0);
        assert_eq!(falloff(75.0, 150.0), 0.5);
        assert_eq!(falloff(150.0, 150.0), 0.0);
        assert_eq!(falloff(400.0, 150.0), 0.0);

        let mut previous = f32::INFINITY;
        for step in 0..=150 {
            let alpha = falloff(step as f32, 150.0);
            assert!(alpha <= previous);
            previous = alpha;
        }
    }

    #[test]
    fn links_only_pairs_under_threshold() {
        let particles = vec![
            particle(0, 0.0, 0.0),
            particle(1, 30.0, 40.0),
            particle(2, 200.0, 0.0),
            particle(3, 0.0, 100.0),
        ];
        let mut connections = Vec::new();
        connect_into(&particles, 100.0, &mut connections);

        let pairs = connections
            .iter()
            .map(|connection| (connection.a, connection.b))
            .collect::<Vec<_>>();
        // 0-3 sits exactly on the threshold and must not link.
        assert_eq!(pairs, vec![(0, 1), (1, 3)]);

        assert_eq!(connections[0].distance, 50.0);
        assert_eq!(connections[0].alpha, 0.5);
    }

    #[test]
    fn pairs_are_unordered_and_never_self_linked() {
        let particles = (0..6)
            .map(|id| particle(id, id as f32, 0.0))
            .collect::<Vec<_>>();
        let mut connections = Vec::new();
        connect_into(&particles, 150.0, &mut connections);

        assert_eq!(connections.len(), 15);
        assert!(connections.iter().all(|connection| connection.a < connection.b));
    }

    #[test]
    fn reuses_the_output_buffer() {
        let particles = vec![particle(0, 0.0, 0.0), particle(1, 1.0, 0.0)];
        let mut connections = vec![Connection {
            a: 9,
            b: 9,
            distance: 0.0,
            alpha: 1.0,
        }];
        connect_into(&particles, 10.0, &mut connections);
        assert_eq!(connections.len(), 1);
        assert_eq!((connections[0].a, connections[0].b), (0, 1));
    }
}
