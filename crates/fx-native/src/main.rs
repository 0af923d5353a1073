use std::time::Instant;
use wgpu::util::DeviceExt;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use fx_core::{
    resolve_or_fallback, DotField, DotFieldConfig, DotSprite, FrameClock, LiteralResolver,
    PointerTracker, RevealConfig, RevealEngine, RevealEvent, RevealEvents, RevealUniforms, Rgba,
};
use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DotUniforms {
    // xy = surface size in px
    resolution: [f32; 4],
    dot_color: [f32; 4],
    glow_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DotInstance {
    pos: [f32; 2],
    radius: f32,
    alpha: f32,
    blur: f32,
}

impl From<&DotSprite> for DotInstance {
    fn from(sprite: &DotSprite) -> Self {
        Self {
            pos: sprite.pos.to_array(),
            radius: sprite.radius,
            alpha: sprite.alpha,
            blur: sprite.blur,
        }
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    dot_pipeline: wgpu::RenderPipeline,
    dot_uniform_buffer: wgpu::Buffer,
    dot_bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    reveal_pipeline: wgpu::RenderPipeline,
    reveal_uniform_buffer: wgpu::Buffer,
    reveal_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    async fn new(
        window: &'w winit::window::Window,
        clear_color: wgpu::Color,
        instance_capacity: usize,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
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
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // ---------------- dot field pipeline ----------------
        let dot_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("dots_shader"),
            source: wgpu::ShaderSource::Wgsl(fx_core::DOTS_WGSL.into()),
        });
        let dot_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dot_uniforms"),
            size: std::mem::size_of::<DotUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = Self::create_instance_buffer(&device, instance_capacity);
        let dot_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dot_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let dot_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dot_bg"),
            layout: &dot_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: dot_uniform_buffer.as_entire_binding(),
            }],
        });
        let dot_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("dot_pl"),
            bind_group_layouts: &[&dot_bgl],
            push_constant_ranges: &[],
        });
        let vertex_buffers = [
            // slot 0: quad positions
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-dot instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<DotInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 8,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 16,
                        shader_location: 4,
                    },
                ],
            },
        ];
        let dot_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("dot_pipeline"),
            layout: Some(&dot_pl),
            vertex: wgpu::VertexState {
                module: &dot_shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &dot_shader,
                entry_point: Some("fs_main"),
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

        // ---------------- reveal pipeline ----------------
        let reveal_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("reveal_shader"),
            source: wgpu::ShaderSource::Wgsl(fx_core::REVEAL_WGSL.into()),
        });
        let reveal_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("reveal_uniforms"),
            size: std::mem::size_of::<RevealUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let reveal_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        let reveal_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("reveal_bg"),
            layout: &reveal_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: reveal_uniform_buffer.as_entire_binding(),
            }],
        });
        let reveal_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("reveal_pl"),
            bind_group_layouts: &[&reveal_bgl],
            push_constant_ranges: &[],
        });
        let reveal_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("reveal_pipeline"),
            layout: Some(&reveal_pl),
            vertex: wgpu::VertexState {
                module: &reveal_shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &reveal_shader,
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
            window,
            surface,
            device,
            queue,
            config,
            dot_pipeline,
            dot_uniform_buffer,
            dot_bind_group,
            quad_vb,
            instance_vb,
            instance_capacity,
            reveal_pipeline,
            reveal_uniform_buffer,
            reveal_bind_group,
            clear_color,
            width: size.width.max(1),
            height: size.height.max(1),
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dot_instance_vb"),
            size: (std::mem::size_of::<DotInstance>() * capacity.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(
        &mut self,
        instances: &[DotInstance],
        dot_uniforms: &DotUniforms,
        reveal_uniforms: &RevealUniforms,
    ) -> Result<(), wgpu::SurfaceError> {
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len();
            self.instance_vb = Self::create_instance_buffer(&self.device, self.instance_capacity);
        }
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue
            .write_buffer(&self.dot_uniform_buffer, 0, bytemuck::bytes_of(dot_uniforms));
        self.queue.write_buffer(
            &self.reveal_uniform_buffer,
            0,
            bytemuck::bytes_of(reveal_uniforms),
        );
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(instances));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.dot_pipeline);
            rpass.set_bind_group(0, &self.dot_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            rpass.draw(0..6, 0..(instances.len() as u32));

            // Reveal overlay, alpha-blended over the dots.
            rpass.set_pipeline(&self.reveal_pipeline);
            rpass.set_bind_group(0, &self.reveal_bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn wgpu_color(c: Rgba) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: c.a as f64,
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Production tuning for the demo mount: dense grid, soft white surface.
    let dot_cfg = DotFieldConfig {
        dot_gap: 14.0,
        dot_size: 1.0,
        dot_color: "#0369a1".into(),
        glow_color: "#0369a1".into(),
        background_color: Some("#ffffff".into()),
        mouse_radius: 120.0,
        distortion_strength: 1.2,
        breathing_speed: 0.8,
        opacity: 0.7,
        return_speed: 0.06,
        ..Default::default()
    };
    let reveal_cfg = RevealConfig {
        follow_cursor: true,
        ..Default::default()
    };

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Lumen FX")
        .with_inner_size(LogicalSize::new(1280.0, 720.0))
        .build(&event_loop)
        .expect("window");

    let size = window.inner_size();
    let mut field = DotField::new(
        dot_cfg.clone(),
        size.width.max(1) as f32,
        size.height.max(1) as f32,
        42,
    )
    .expect("dot field config");
    let mut reveal = RevealEngine::new(reveal_cfg).expect("reveal config");

    let resolver = LiteralResolver;
    let dot_color = resolve_or_fallback(&resolver, &dot_cfg.dot_color);
    let glow_color = resolve_or_fallback(&resolver, &dot_cfg.glow_color);
    let clear_color = dot_cfg
        .background_color
        .as_deref()
        .map(|token| wgpu_color(resolve_or_fallback(&resolver, token)))
        .unwrap_or(wgpu::Color::BLACK);

    // No adapter means no effect, not a crash.
    let mut state = match pollster::block_on(GpuState::new(&window, clear_color, field.dots().len()))
    {
        Ok(state) => state,
        Err(e) => {
            log::error!("GPU init error: {e:?}; nothing to render");
            return;
        }
    };

    let mut tracker = PointerTracker::new();
    let mut clock = FrameClock::new();
    let start = Instant::now();
    let mut sprites: Vec<DotSprite> = Vec::new();
    let mut instances: Vec<DotInstance> = Vec::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::Resized(new_size),
                ..
            } => {
                state.resize(new_size);
                field.rebuild(new_size.width.max(1) as f32, new_size.height.max(1) as f32);
            }
            Event::WindowEvent {
                event: WindowEvent::CursorMoved { position, .. },
                ..
            } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                tracker.sample(pos);
                let uv = Vec2::new(
                    pos.x / state.width.max(1) as f32,
                    pos.y / state.height.max(1) as f32,
                );
                reveal.pointer_moved(uv);
            }
            Event::WindowEvent {
                event: WindowEvent::CursorLeft { .. },
                ..
            } => {
                tracker.leave();
                reveal.pointer_left();
            }
            Event::WindowEvent {
                event: WindowEvent::Occluded(occluded),
                ..
            } => {
                if !occluded {
                    // Coming back from a hidden window: snap to rest so no
                    // stale velocities play out as a jump.
                    field.reset_after_hidden();
                    tracker.reset_velocity();
                    clock.reset();
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::AboutToWait => {
                let now_ms = start.elapsed().as_secs_f64() * 1000.0;
                let mut events = RevealEvents::new();
                let Some(reveal_frame) = reveal.frame(now_ms, &mut events) else {
                    state.window.request_redraw();
                    return;
                };
                for ev in &events {
                    match ev {
                        RevealEvent::Started => log::info!("[reveal] started"),
                        RevealEvent::Completed => log::info!("[reveal] completed"),
                    }
                }

                let time_sec = now_ms / 1000.0;
                if let Some(dt) = clock.tick(now_ms) {
                    field.step(dt, time_sec, tracker.input());
                    tracker.decay();
                }
                field.sprites(time_sec, &mut sprites);
                instances.clear();
                instances.extend(sprites.iter().map(DotInstance::from));

                let resolution = [state.width as f32, state.height as f32];
                let dot_uniforms = DotUniforms {
                    resolution: [resolution[0], resolution[1], 0.0, 0.0],
                    dot_color: dot_color.to_array(),
                    glow_color: glow_color.to_array(),
                };
                let reveal_uniforms = reveal.uniforms(resolution, &reveal_frame);

                match state.render(&instances, &dot_uniforms, &reveal_uniforms) {
                    Ok(_) => state.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(_) => {}
                }
            }
            _ => {}
        })
        .unwrap();
}
