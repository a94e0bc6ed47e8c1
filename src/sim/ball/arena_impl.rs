use glam::Vec3A;

use crate::{
    Arena, ArenaError, BallHitInfo, BallLastHit, BallState, GameMode, Team,
    consts::{UU_TO_BT, ball::car_hit_impulse, curves, heatseeker},
    sim::arena::Objects,
};

impl Arena {
    #[inline]
    #[must_use]
    pub const fn get_ball_state(&self) -> &BallState {
        &self.objects.ball.state
    }

    /// Teleports the ball. Goals can be scored again afterwards, even if the ball
    /// was already sitting in a net.
    pub fn set_ball_state(&mut self, state: BallState) -> Result<(), ArenaError> {
        if !state.phys.is_finite() {
            return Err(ArenaError::invalid_arg(format!(
                "ball state must be finite, got {}",
                state.phys
            )));
        }

        self.objects.ball.set_state(state);
        self.rearm_goal();
        Ok(())
    }
}

impl Objects {
    /// Bookkeeping after `car_id` touched the ball on this tick: the extra hit impulse,
    /// the touch records on both sides and heatseeker retargeting
    pub(crate) fn on_ball_hit(&mut self, car_id: u64, relative_pos_on_ball: Vec3A) {
        let Some(car) = self.cars.get_mut(&car_id) else {
            return;
        };

        let ball = &mut self.ball;
        let tick_count = self.tick_count;

        let mut ball_hit_info = BallHitInfo {
            relative_pos_on_ball,
            ball_pos: ball.state.pos,
            extra_hit_vel: Vec3A::ZERO,
            tick_count_when_hit: tick_count,
            tick_count_when_extra_impulse_applied: tick_count,
        };

        // Once an extra impulse is applied, the next one has to wait at least a tick
        let extra_on_cooldown = car.state.ball_hit_info.is_some_and(|old| {
            let last = old.tick_count_when_extra_impulse_applied;
            tick_count <= last + 1 && last <= tick_count
        });

        if let Some(old) = car.state.ball_hit_info
            && extra_on_cooldown
        {
            ball_hit_info.tick_count_when_extra_impulse_applied =
                old.tick_count_when_extra_impulse_applied;
        } else {
            let car_forward = car.state.phys.rot_mat.x_axis;
            let rel_pos = ball.state.pos - car.state.phys.pos;
            let rel_speed = (ball.state.vel - car.state.phys.vel)
                .length()
                .min(car_hit_impulse::MAX_DELTA_VEL_UU);

            if rel_speed > 0.0 {
                let mut hit_dir =
                    (rel_pos * Vec3A::new(1.0, 1.0, car_hit_impulse::Z_SCALE_NORMAL)).normalize();
                let forward_dir_adjustment = car_forward
                    * hit_dir.dot(car_forward)
                    * const { 1.0 - car_hit_impulse::FORWARD_SCALE };
                hit_dir = (hit_dir - forward_dir_adjustment).normalize();

                let added_vel = hit_dir
                    * rel_speed
                    * curves::BALL_CAR_EXTRA_IMPULSE_FACTOR.get_output(rel_speed)
                    * self.mutator_config.ball_hit_extra_force_scale;
                ball_hit_info.extra_hit_vel = added_vel;

                ball.velocity_impulse_cache += added_vel * UU_TO_BT;
            }
        }

        car.state.ball_hit_info = Some(ball_hit_info);
        ball.state.last_hit = Some(BallLastHit {
            car_id,
            tick_count,
        });

        if self.game_mode == GameMode::Heatseeker {
            let hs_info = &mut ball.state.hs_info;
            let can_increase = hs_info.time_since_hit > heatseeker::MIN_SPEEDUP_INTERVAL
                || hs_info.y_target_dir == 0.0;

            // Blue attacks the positive y net
            let new_target_dir = if car.team() == Team::Blue { 1.0 } else { -1.0 };
            if can_increase && new_target_dir != hs_info.y_target_dir {
                hs_info.time_since_hit = 0.0;
                hs_info.cur_target_speed = heatseeker::MAX_SPEED
                    .min(hs_info.cur_target_speed + heatseeker::TARGET_SPEED_INCREMENT);
            }

            hs_info.y_target_dir = new_target_dir;
        }
    }
}
