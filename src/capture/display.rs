//! Operator-facing overlay window and its keyboard commands.
//!
//! The capture loop owns the pacing: each iteration hands the annotated
//! frame to [`OverlayDisplay::show`], which pumps window events and
//! reports at most one command back.

use crate::errors::DisplayError;
use crate::Frame;

/// Operator request raised through the overlay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Snapshot the current outlines and rebuild the model.
    Snapshot,
    /// Shut the whole session down.
    Quit,
}

/// Sink for annotated frames, plus the keyboard channel back.
pub trait OverlayDisplay {
    /// Present one frame and return a pending command, if any. Closing
    /// the window counts as [`Command::Quit`].
    fn show(&mut self, frame: &Frame) -> Result<Option<Command>, DisplayError>;
}

#[cfg(feature = "viewer")]
pub use window::OverlayWindow;

#[cfg(feature = "viewer")]
mod window {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::debug;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
    use winit::event_loop::EventLoop;
    use winit::keyboard::Key;
    use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
    use winit::window::WindowBuilder;

    /// Overlay window pinned to the top-left corner of the desktop.
    pub struct OverlayWindow {
        event_loop: EventLoop<()>,
        window: Arc<winit::window::Window>,
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        pipeline: wgpu::RenderPipeline,
        bind_group_layout: wgpu::BindGroupLayout,
        sampler: wgpu::Sampler,
        texture: Option<(wgpu::Texture, wgpu::BindGroup, u32, u32)>,
    }

    impl OverlayWindow {
        pub fn new(width: u32, height: u32) -> Result<OverlayWindow, DisplayError> {
            let event_loop = EventLoop::new().map_err(|e| DisplayError {
                reason: e.to_string(),
            })?;
            let window = Arc::new(
                WindowBuilder::new()
                    .with_title("contours  [s] snapshot  [q] quit")
                    .with_inner_size(PhysicalSize::new(width, height))
                    .with_position(PhysicalPosition::new(0, 0))
                    .build(&event_loop)
                    .map_err(|e| DisplayError {
                        reason: e.to_string(),
                    })?,
            );

            let instance = wgpu::Instance::default();
            let surface = instance.create_surface(window.clone()).map_err(|e| DisplayError {
                reason: e.to_string(),
            })?;
            let adapter =
                pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::LowPower,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                }))
                .ok_or_else(|| DisplayError {
                    reason: "no compatible graphics adapter".into(),
                })?;
            let (device, queue) = pollster::block_on(adapter.request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("overlay device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            ))
            .map_err(|e| DisplayError {
                reason: e.to_string(),
            })?;

            let size = window.inner_size();
            let format = surface.get_capabilities(&adapter).formats[0];
            let config = wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width.max(1),
                height: size.height.max(1),
                desired_maximum_frame_latency: 2,
                present_mode: wgpu::PresentMode::Fifo,
                alpha_mode: wgpu::CompositeAlphaMode::Auto,
                view_formats: vec![],
            };
            surface.configure(&device, &config);

            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("overlay blit shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
            });
            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("overlay bind group layout"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("overlay layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("overlay pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
            let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("overlay sampler"),
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            });

            Ok(OverlayWindow {
                event_loop,
                window,
                surface,
                device,
                queue,
                config,
                pipeline,
                bind_group_layout,
                sampler,
                texture: None,
            })
        }

        fn ensure_texture(&mut self, width: u32, height: u32) {
            if matches!(self.texture, Some((_, _, w, h)) if w == width && h == height) {
                return;
            }
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("frame texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("frame bind group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });
            self.texture = Some((texture, bind_group, width, height));
        }

        fn upload_frame(&mut self, frame: &Frame) {
            let (width, height) = frame.dimensions();
            self.ensure_texture(width, height);
            let Some((texture, _, _, _)) = &self.texture else {
                return;
            };

            // COPY_DST rows must be 256-byte aligned, so repack into a
            // padded RGBA staging buffer.
            let unpadded = width as usize * 4;
            let padded = (unpadded + 255) / 256 * 256;
            let mut staging = vec![0u8; padded * height as usize];
            for (y, row) in frame.rows().enumerate() {
                let out = &mut staging[y * padded..y * padded + unpadded];
                for (x, px) in row.enumerate() {
                    out[x * 4] = px[0];
                    out[x * 4 + 1] = px[1];
                    out[x * 4 + 2] = px[2];
                    out[x * 4 + 3] = 255;
                }
            }
            self.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &staging,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded as u32),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        fn render(&mut self) -> Result<(), DisplayError> {
            let Some((_, bind_group, _, _)) = &self.texture else {
                return Ok(());
            };
            let output = match self.surface.get_current_texture() {
                Ok(frame) => frame,
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.surface.configure(&self.device, &self.config);
                    return Ok(());
                }
                Err(e) => {
                    return Err(DisplayError {
                        reason: e.to_string(),
                    })
                }
            };
            let view = output
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("overlay encoder"),
                });
            {
                let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, bind_group, &[]);
                rpass.draw(0..3, 0..1);
            }
            self.queue.submit(Some(encoder.finish()));
            output.present();
            Ok(())
        }
    }

    fn key_command(event: &KeyEvent) -> Option<Command> {
        if event.state != ElementState::Pressed {
            return None;
        }
        match &event.logical_key {
            Key::Character(c) => match c.as_str() {
                "s" => Some(Command::Snapshot),
                "q" => Some(Command::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    impl OverlayDisplay for OverlayWindow {
        fn show(&mut self, frame: &Frame) -> Result<Option<Command>, DisplayError> {
            self.upload_frame(frame);

            let mut command = None;
            let mut resized = None;
            let status = self
                .event_loop
                .pump_events(Some(Duration::ZERO), |event, elwt| {
                    if let Event::WindowEvent { event, .. } = &event {
                        match event {
                            WindowEvent::CloseRequested => elwt.exit(),
                            WindowEvent::Resized(size) => resized = Some(*size),
                            WindowEvent::KeyboardInput { event, .. } => {
                                if command.is_none() {
                                    command = key_command(event);
                                }
                            }
                            _ => {}
                        }
                    }
                });
            if let Some(size) = resized {
                self.config.width = size.width.max(1);
                self.config.height = size.height.max(1);
                self.surface.configure(&self.device, &self.config);
            }
            if matches!(status, PumpStatus::Exit(_)) {
                debug!("overlay window closed");
                return Ok(Some(Command::Quit));
            }

            self.render()?;
            self.window.request_redraw();
            Ok(command)
        }
    }
}
