//! Reveal view: timeline and glow state from fx-core, shading on the GPU
//! through a full-viewport quad over a transparent canvas.

use std::cell::RefCell;
use std::rc::Rc;

use fx_core::{RevealConfig, RevealEngine, RevealEvent, RevealEvents, RevealUniforms};
use glam::Vec2;
use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {e:?}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("reveal_shader"),
            source: wgpu::ShaderSource::Wgsl(fx_core::REVEAL_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("reveal_uniforms"),
            size: std::mem::size_of::<RevealUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("reveal_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("reveal_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("reveal_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("reveal_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_reveal"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            width,
            height,
        })
    }

    fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(&mut self, uniforms: &RevealUniforms) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("reveal_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("reveal_rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

pub async fn mount(canvas_id: &str, cfg: RevealConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{canvas_id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;

    // Backing size tracks the CSS size at a fixed 1.0 pixel ratio; the glow
    // has no detail worth a DPR-sized framebuffer.
    let sync_size = |canvas: &web::HtmlCanvasElement| {
        let rect = canvas.get_bounding_client_rect();
        canvas.set_width(rect.width().max(1.0) as u32);
        canvas.set_height(rect.height().max(1.0) as u32);
    };
    sync_size(&canvas);

    let animate_on_scroll = cfg.animate_on_scroll;
    let scroll_threshold = cfg.scroll_threshold;
    let follow_cursor = cfg.follow_cursor;
    let engine = Rc::new(RefCell::new(RevealEngine::new(cfg)?));

    // A surface without WebGPU degrades to no visible effect.
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let mut gpu = match GpuState::new(leaked_canvas).await {
        Ok(g) => g,
        Err(e) => {
            log::error!("[reveal] WebGPU init error: {e:?}; effect disabled");
            return Ok(());
        }
    };

    if animate_on_scroll {
        let engine_o = engine.clone();
        let cb = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: web::IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: web::IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        engine_o.borrow_mut().release_gate();
                        observer.disconnect();
                    }
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);
        let init = web::IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(scroll_threshold as f64));
        match web::IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                observer.observe(&canvas);
                cb.forget();
            }
            Err(e) => {
                // Without an observer the gate would never open; run ungated.
                log::warn!("[gate] IntersectionObserver unavailable ({e:?}); running ungated");
                engine.borrow_mut().release_gate();
            }
        }
    }

    if follow_cursor {
        let engine_m = engine.clone();
        let canvas_m = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let rect = canvas_m.get_bounding_client_rect();
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                return;
            }
            let u = (ev.client_x() as f64 - rect.left()) / rect.width();
            let v = (ev.client_y() as f64 - rect.top()) / rect.height();
            engine_m
                .borrow_mut()
                .pointer_moved(Vec2::new(u as f32, v as f32));
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();

        let engine_l = engine.clone();
        let closure = Closure::wrap(Box::new(move || {
            engine_l.borrow_mut().pointer_left();
        }) as Box<dyn FnMut()>);
        canvas
            .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    {
        let canvas_r = canvas.clone();
        let closure = Closure::wrap(Box::new(move || {
            let rect = canvas_r.get_bounding_client_rect();
            canvas_r.set_width(rect.width().max(1.0) as u32);
            canvas_r.set_height(rect.height().max(1.0) as u32);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    // Render loop driven by requestAnimationFrame; the engine's internal
    // throttle keeps actual work at the 60fps target.
    let start = Instant::now();
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let engine_t = engine.clone();
    let canvas_t = canvas.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        let mut events = RevealEvents::new();
        let maybe_frame = engine_t.borrow_mut().frame(now_ms, &mut events);
        for ev in &events {
            match ev {
                RevealEvent::Started => log::info!("[reveal] started"),
                RevealEvent::Completed => log::info!("[reveal] completed"),
            }
        }
        if let Some(frame) = maybe_frame {
            let (w, h) = (canvas_t.width(), canvas_t.height());
            gpu.resize_if_needed(w, h);
            let uniforms = engine_t
                .borrow()
                .uniforms([w.max(1) as f32, h.max(1) as f32], &frame);
            if let Err(e) = gpu.render(&uniforms) {
                log::error!("[reveal] render error: {e:?}");
            }
        }
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }

    Ok(())
}
