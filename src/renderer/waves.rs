//! WebGPU wave driver
//!
//! Three passes over a pair of float textures:
//! - propagate: one leapfrog step from the back texture into the front one
//! - influence: queued flares blended onto the front texture as fans
//! - distort: the background refracted by the interpolated height field

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::shapes::flare_fan;
use super::vertex::{FlareInstance, FlareVertex};
use crate::error::PondError;
use crate::settings::WaveConfig;
use crate::water::{WaterPlane, WaveSimulator};

/// Height field texel format; r = height, g = previous height
pub const WATER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

// ============================================================================
// GPU DATA STRUCTURES (must match shaders)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PropagateParams {
    size: [f32; 2], // offset 0
    damping: f32,   // offset 8
    _pad: f32,      // pad to 16 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InfluenceParams {
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DistortParams {
    size: [f32; 2],    // offset 0
    time: f32,         // offset 8
    displacement: f32, // offset 12
    shininess: f32,    // offset 16
    _pad: [f32; 3],    // pad to 32 bytes
}

/// One height field buffer on the GPU
pub struct WaterTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl WaterTexture {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

pub struct Waves {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: WaveConfig,

    propagate_pipeline: wgpu::RenderPipeline,
    propagate_layout: wgpu::BindGroupLayout,
    propagate_params: wgpu::Buffer,

    influence_pipeline: wgpu::RenderPipeline,
    influence_bind_group: wgpu::BindGroup,
    influence_params: wgpu::Buffer,
    flare_vertices: wgpu::Buffer,
    flare_indices: wgpu::Buffer,
    flare_index_count: u32,

    distort_pipeline: wgpu::RenderPipeline,
    distort_layout: wgpu::BindGroupLayout,
    distort_params: wgpu::Buffer,
    sampler: wgpu::Sampler,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[], // No vertex buffers - fullscreen triangle
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

impl Waves {
    /// Build the wave pipelines; `output_format` is the format of the
    /// target the distort pass renders into
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_format: wgpu::TextureFormat,
        config: &WaveConfig,
    ) -> Result<Self, PondError> {
        log::info!("Creating wave pipelines...");

        // Propagate
        let propagate_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("waves_propagate"),
            source: wgpu::ShaderSource::Wgsl(include_str!("waves_propagate.wgsl").into()),
        });
        let propagate_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("waves_propagate_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT), texture_entry(1)],
        });
        let propagate_pipeline = fullscreen_pipeline(
            device,
            "waves_propagate",
            &propagate_shader,
            &propagate_layout,
            WATER_FORMAT,
        );
        let propagate_params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("waves_propagate_params"),
            size: std::mem::size_of::<PropagateParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Influence
        let influence_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("waves_influence"),
            source: wgpu::ShaderSource::Wgsl(include_str!("waves_influence.wgsl").into()),
        });
        let influence_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("waves_influence_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let influence_params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("waves_influence_params"),
            size: std::mem::size_of::<InfluenceParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let influence_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("waves_influence_bind_group"),
            layout: &influence_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: influence_params.as_entire_binding(),
            }],
        });
        let influence_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("waves_influence_pipeline_layout"),
                bind_group_layouts: &[&influence_layout],
                immediate_size: 0,
            });
        let influence_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("waves_influence"),
            layout: Some(&influence_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &influence_shader,
                entry_point: Some("vs_main"),
                buffers: &[FlareVertex::desc(), FlareInstance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &influence_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: WATER_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let (fan_vertices, fan_indices) = flare_fan(config.flare_precision)?;
        let flare_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flare_vertices"),
            contents: bytemuck::cast_slice(&fan_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let flare_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flare_indices"),
            contents: bytemuck::cast_slice(&fan_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Distort
        let distort_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("waves_distort"),
            source: wgpu::ShaderSource::Wgsl(include_str!("waves_distort.wgsl").into()),
        });
        let distort_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("waves_distort_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                texture_entry(2),
                texture_entry(3),
                texture_entry(4),
            ],
        });
        let distort_pipeline = fullscreen_pipeline(
            device,
            "waves_distort",
            &distort_shader,
            &distort_layout,
            output_format,
        );
        let distort_params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("waves_distort_params"),
            contents: bytemuck::bytes_of(&DistortParams {
                size: [1.0, 1.0],
                time: 0.0,
                displacement: config.displacement,
                shininess: config.shininess,
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("waves_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            min_filter: wgpu::FilterMode::Linear,
            mag_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!(
            "Wave pipelines created (flare precision {})",
            config.flare_precision
        );

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            config: *config,
            propagate_pipeline,
            propagate_layout,
            propagate_params,
            influence_pipeline,
            influence_bind_group,
            influence_params,
            flare_vertices,
            flare_indices,
            flare_index_count: fan_indices.len() as u32,
            distort_pipeline,
            distort_layout,
            distort_params,
            sampler,
        })
    }

    /// Composite the background through the water into `target`
    ///
    /// `time` blends the back and front height fields, so it should be the
    /// fraction of a simulation tick elapsed since the last propagation.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        background: &wgpu::TextureView,
        plane: &WaterPlane<WaterTexture>,
        width: u32,
        height: u32,
        time: f32,
    ) {
        self.queue.write_buffer(
            &self.distort_params,
            0,
            bytemuck::bytes_of(&DistortParams {
                size: [width as f32, height as f32],
                time: time.clamp(0.0, 1.0),
                displacement: self.config.displacement,
                shininess: self.config.shininess,
                _pad: [0.0; 3],
            }),
        );

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("waves_distort_bind_group"),
            layout: &self.distort_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.distort_params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(background),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(plane.back().view()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(plane.front().view()),
                },
            ],
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("waves_distort_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        render_pass.set_pipeline(&self.distort_pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

impl WaveSimulator for Waves {
    type Buffer = WaterTexture;

    fn create_buffer(&self, width: u32, height: u32) -> WaterTexture {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("water_height"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: WATER_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());

        WaterTexture { texture, view }
    }

    fn propagate(&mut self, plane: &mut WaterPlane<WaterTexture>) {
        plane.flip();

        let size = [plane.width() as f32, plane.height() as f32];
        self.queue.write_buffer(
            &self.propagate_params,
            0,
            bytemuck::bytes_of(&PropagateParams {
                size,
                damping: self.config.damping,
                _pad: 0.0,
            }),
        );
        self.queue.write_buffer(
            &self.influence_params,
            0,
            bytemuck::bytes_of(&InfluenceParams {
                size,
                _pad: [0.0; 2],
            }),
        );

        let instances: Vec<FlareInstance> = plane
            .take_flares()
            .iter()
            .map(|flare| FlareInstance {
                origin: [flare.x, flare.y],
                radius: flare.radius,
            })
            .collect();
        let instance_buffer = (!instances.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("flare_instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let source = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("waves_propagate_bind_group"),
            layout: &self.propagate_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.propagate_params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(plane.back().view()),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("waves_propagate_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("waves_propagate_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: plane.front().view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.propagate_pipeline);
            render_pass.set_bind_group(0, &source, &[]);
            render_pass.draw(0..3, 0..1);

            // Flares blend over the freshly propagated field
            if let Some(instance_buffer) = &instance_buffer {
                render_pass.set_pipeline(&self.influence_pipeline);
                render_pass.set_bind_group(0, &self.influence_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.flare_vertices.slice(..));
                render_pass.set_vertex_buffer(1, instance_buffer.slice(..));
                render_pass.set_index_buffer(self.flare_indices.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..self.flare_index_count, 0, 0..instances.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
