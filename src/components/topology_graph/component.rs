use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, WheelEvent};

use super::layout::{LayoutFrame, TopologyLayout};
use crate::api::SharedApi;
use crate::charts::geometry::Corners;
use crate::charts::{NodeShapeProps, NodeShapeSquare, svg_number};
use crate::config::AppConfig;
use crate::controller::{LayoutHints, NodeView};
use crate::store::model::edge_id;
use crate::store::{Action, Store};

const NODE_CORNERS: Corners = Corners { rx: 0.4, ry: 0.4 };

fn draw_edges(nodes: &[NodeView], frame: &LayoutFrame, highlighted: &BTreeSet<String>) -> AnyView {
	nodes
		.iter()
		.flat_map(|node| node.adjacency.iter().map(move |target| (node, target)))
		.filter_map(|(node, target)| {
			let (x1, y1) = frame.positions.get(&node.id)?;
			let (x2, y2) = frame.positions.get(target)?;
			let class = if highlighted.contains(&edge_id(&node.id, target)) {
				"edge highlighted"
			} else {
				"edge"
			};
			Some(view! {
				<line
					class=class
					x1=svg_number(*x1)
					y1=svg_number(*y1)
					x2=svg_number(*x2)
					y2=svg_number(*y2)
				/>
			})
		})
		.collect_view()
		.into_any()
}

#[component]
pub fn TopologyGraph(
	#[prop(into)] nodes: Signal<Vec<NodeView>>,
	#[prop(into)] highlighted_edge_ids: Signal<BTreeSet<String>>,
	#[prop(into)] force_relayout: Signal<bool>,
	#[prop(into)] hints: Signal<LayoutHints>,
	#[prop(into)] topology_id: Signal<Option<String>>,
) -> impl IntoView {
	let store = expect_context::<Store>();
	let api = expect_context::<SharedApi>();
	let config = expect_context::<AppConfig>();

	let container_ref = NodeRef::<leptos::html::Div>::new();
	let layout = Rc::new(RefCell::new(TopologyLayout::new(800.0, 600.0)));
	let frame = RwSignal::new(LayoutFrame::default());
	let alive = Arc::new(AtomicBool::new(true));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (layout_init, animate_init, alive_init) = (layout.clone(), animate.clone(), alive.clone());
	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let (w, h) = (
			Some(container.client_width() as f64).filter(|w| *w > 0.0).unwrap_or(800.0),
			Some(container.client_height() as f64).filter(|h| *h > 0.0).unwrap_or(600.0),
		);
		layout_init.borrow_mut().resize(w, h);

		let (layout_anim, animate_inner, alive_anim) =
			(layout_init.clone(), animate_init.clone(), alive_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			{
				let mut layout = layout_anim.borrow_mut();
				if layout.step(0.016) {
					frame.set(layout.frame());
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let layout_sync = layout.clone();
	Effect::new(move |_| {
		let force = force_relayout.get();
		nodes.with(|nodes| layout_sync.borrow_mut().sync(nodes, force));
	});

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	let pointer = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let rect = container_ref.get()?.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let layout_md = layout.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(&ev) {
			layout_md.borrow_mut().start_pan(x, y);
		}
	};

	let layout_mm = layout.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(&ev) {
			layout_mm.borrow_mut().pan_to(x, y);
		}
	};

	let layout_mu = layout.clone();
	let on_mouseup = move |_: MouseEvent| layout_mu.borrow_mut().end_pan();

	let layout_ml = layout.clone();
	let on_mouseleave = move |_: MouseEvent| layout_ml.borrow_mut().end_pan();

	let layout_wh = layout;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		if let Some((x, y)) = pointer(mouse) {
			layout_wh.borrow_mut().zoom_at(x, y, ev.delta_y() < 0.0);
		}
	};

	let (node_size, font_scale) = (config.node_size, config.metric_font_scale);
	let draw_nodes = move || {
		let positions = frame.with(|f| f.positions.clone());
		nodes
			.get()
			.into_iter()
			.filter_map(|node| {
				let (x, y) = positions.get(&node.id).copied()?;
				let (store_enter, store_leave, store_click) = (store.clone(), store.clone(), store.clone());
				let api = api.clone();
				let (enter_id, leave_id, click_id) = (node.id.clone(), node.id.clone(), node.id.clone());
				let class = if node.selected { "node selected" } else { "node" };
				let props = NodeShapeProps {
					id: node.id.clone(),
					size: node_size,
					color: node.color.clone(),
					highlighted: node.highlighted,
					metric: node.metric.clone(),
					corners: NODE_CORNERS,
					font_scale,
				};
				Some(view! {
					<g
						class=class
						transform=format!("translate({},{})", svg_number(x), svg_number(y))
						on:mousedown=|ev: MouseEvent| ev.stop_propagation()
						on:mouseenter=move |_| store_enter.dispatch(Action::EnterNode(enter_id.clone()))
						on:mouseleave=move |_| store_leave.dispatch(Action::LeaveNode(leave_id.clone()))
						on:click=move |_| {
							store_click.dispatch(Action::ClickNode(click_id.clone()));
							let state = store_click.state();
							if state.selected_node_id() == Some(click_id.as_str()) {
								if let Some(topology) = topology_id.get_untracked() {
									api.get_node_details(&topology, &click_id);
								}
							}
						}
					>
						<NodeShapeSquare props=props />
						<text class="node-label" y=svg_number(node_size * 0.75)>
							{node.label}
						</text>
					</g>
				})
			})
			.collect_view()
	};

	view! {
		<div
			node_ref=container_ref
			class="topology-graph"
			style=move || {
				let hints = hints.get();
				format!("top: {}px; right: {}px;", hints.top_margin, hints.details_width)
			}
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
		>
			<svg width="100%" height="100%">
				<g transform=move || frame.with(|f| f.transform.to_svg())>
					<g class="edges">
						{move || {
							frame.with(|f| {
								nodes.with(|n| highlighted_edge_ids.with(|h| draw_edges(n, f, h)))
							})
						}}
					</g>
					<g class="nodes">{draw_nodes}</g>
				</g>
			</svg>
		</div>
	}
}
