//! Scene aggregate and nearest-hit dispatch.
//!
//! A scene is built once by the driver (usually through [`Scene::setup`]) and
//! is read-only while rendering, so it can be shared by every worker thread.

use crate::{
    hittable::{hit_closest, HitRecord, Hittable},
    Color, Cuboid, Dielectric, Lambertian, Material, MaterialId, Metal, Ray, RenderSettings,
    Sphere, Triangle,
};
use glint_math::{Aabb, Interval, Vec3};

/// Every primitive the renderer knows about, plus the materials they use.
#[derive(Debug, Clone)]
pub struct Scene {
    materials: Vec<Material>,
    ground: Option<Sphere>,
    spheres: Vec<Sphere>,
    boxes: Vec<Cuboid>,
    mesh: Vec<Triangle>,
    mesh_bbox: Aabb,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene. Every ray misses it.
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            ground: None,
            spheres: Vec::new(),
            boxes: Vec::new(),
            mesh: Vec::new(),
            mesh_bbox: Aabb::EMPTY,
        }
    }

    /// Build the default scene: a ground sphere, three large spheres and two
    /// rows of small glass and metal marbles.
    ///
    /// `settings.albedo` colors the metals and `settings.refractive_index`
    /// scales every dielectric's index.
    pub fn setup(settings: &RenderSettings) -> Self {
        let mut scene = Scene::new();
        let ri = settings.refractive_index;

        let grass = scene.add_material(Lambertian::new(Color::new(0.2, 0.9, 0.2)));
        let jade = scene.add_material(Lambertian::new(Color::new(0.1, 0.8, 0.4)));
        let metal = scene.add_material(Metal::new(settings.albedo));
        let glass = scene.add_material(Dielectric::new(1.5 * ri));
        let dense = scene.add_material(Dielectric::new(1.7 * ri));
        let thin = scene.add_material(Dielectric::new(0.8 * ri));
        let light = scene.add_material(Dielectric::new(1.1 * ri));

        scene.set_ground(Sphere::new(Vec3::new(0.0, -1000.5, 0.0), 1000.0, grass));

        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 0.5, jade));
        scene.add_sphere(Sphere::new(Vec3::new(1.0, 0.0, 0.0), 0.5, metal));
        scene.add_sphere(Sphere::new(Vec3::new(-1.0, 0.0, 0.0), 0.5, glass));

        for (z, xs) in [(0.9, [-1.0, -0.5, 0.2, 0.6]), (1.3, [-0.8, -0.3, 0.0, 0.4])] {
            for (x, material) in xs.into_iter().zip([dense, thin, light, metal]) {
                scene.add_sphere(Sphere::new(Vec3::new(x, -0.3, z), 0.1, material));
            }
        }

        log::info!(
            "Scene set up: {} spheres, {} boxes, {} triangles, {} materials",
            scene.spheres.len(),
            scene.boxes.len(),
            scene.mesh.len(),
            scene.materials.len()
        );

        scene
    }

    /// Add a material to the arena and return its handle.
    pub fn add_material(&mut self, material: impl Into<Material>) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material.into());
        id
    }

    /// Look up a material by handle.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    pub fn set_ground(&mut self, ground: Sphere) {
        self.ground = Some(ground);
    }

    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_box(&mut self, cuboid: Cuboid) {
        self.boxes.push(cuboid);
    }

    /// Replace the mesh and recompute its bounding box.
    pub fn set_mesh(&mut self, triangles: Vec<Triangle>) {
        self.mesh_bbox = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, tri| Aabb::surrounding(&acc, &tri.bounding_box()));
        self.mesh = triangles;
    }

    /// Replace the mesh with indexed geometry, translated by `offset`.
    ///
    /// Index triples that are incomplete or point outside `vertices` are skipped.
    pub fn set_mesh_indexed(
        &mut self,
        vertices: &[Vec3],
        indices: &[u32],
        offset: Vec3,
        material: MaterialId,
    ) {
        if indices.len() % 3 != 0 {
            log::warn!(
                "Mesh index count {} is not a multiple of 3; ignoring the trailing indices",
                indices.len()
            );
        }

        let mut skipped = 0usize;
        let triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let corner = |i: u32| vertices.get(i as usize).map(|v| *v + offset);
                match (corner(tri[0]), corner(tri[1]), corner(tri[2])) {
                    (Some(v0), Some(v1), Some(v2)) => Some(Triangle::new(v0, v1, v2, material)),
                    _ => {
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        if skipped > 0 {
            log::warn!("Skipped {} triangles with out-of-range vertex indices", skipped);
        }
        log::debug!("Mesh has {} triangles", triangles.len());

        self.set_mesh(triangles);
    }

    pub fn ground(&self) -> Option<&Sphere> {
        self.ground.as_ref()
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn boxes(&self) -> &[Cuboid] {
        &self.boxes
    }

    pub fn mesh(&self) -> &[Triangle] {
        &self.mesh
    }

    pub fn mesh_bbox(&self) -> Aabb {
        self.mesh_bbox
    }

    /// Find the nearest hit strictly inside `ray_t`.
    ///
    /// Tests the ground, then spheres, then boxes, each against the bound
    /// tightened by the hits before it. The mesh is only walked when the ray
    /// meets its bounding box. Because the bound only ever shrinks, the
    /// result does not depend on the order primitives were added in.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if !ray_t.is_valid() {
            return None;
        }

        let mut closest = None;

        hit_closest(self.ground.iter(), ray, ray_t, &mut closest);
        hit_closest(&self.spheres, ray, ray_t, &mut closest);
        hit_closest(&self.boxes, ray, ray_t, &mut closest);

        if !self.mesh.is_empty() {
            let bound = ray_t.with_max(closest.map_or(ray_t.max, |rec: HitRecord| rec.t));
            if self.mesh_bbox.hit(ray, bound) {
                hit_closest(&self.mesh, ray, ray_t, &mut closest);
            }
        }

        closest
    }
}
